pub mod acia;
pub mod apple2e;

pub use acia::Acia;
pub use apple2e::Apple2eSystem;
