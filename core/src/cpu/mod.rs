//! The Apple //e's CPU: a synchronous interpreter, not a cycle-stepped
//! bus-master component — it drives a plain [`crate::memory::Memory`], not
//! a shared bus, so there is no master/slave arbitration for it to
//! participate in.
pub mod w65c02;
pub use w65c02::W65C02;
