pub mod cpu;
pub mod error;
pub mod iwm;
pub mod memory;
pub mod trace;

pub mod prelude {
    pub use crate::cpu::W65C02;
    pub use crate::error::CoreError;
    pub use crate::iwm::Iwm;
    pub use crate::memory::acia_port::AciaPort;
    pub use crate::memory::{Memory, ACIA_BASES};
    pub use crate::trace::{Trace, TraceEntry};
}
