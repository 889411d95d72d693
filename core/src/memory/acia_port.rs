//! The seam `Memory` plugs a concrete ACIA into. The serial chip itself
//! lives one layer up, in the composing machine crate; this trait is just
//! enough surface for `Memory` to route four-byte register access and a
//! periodic poll to whatever the composing machine installs.

/// A memory-mapped ACIA, addressed by `Memory` at an offset (0..=3)
/// relative to whichever base address the composing machine registered it
/// at.
pub trait AciaPort {
    fn read(&mut self, offset: u16) -> u8;
    fn write(&mut self, offset: u16, value: u8);
    /// Drain the transmit FIFO to the host and pull one received byte in,
    /// if either is ready. `Memory` doesn't call this itself — the
    /// composing machine's driver loop does, once per N cycles.
    fn poll(&mut self);
    fn irq_pending(&self) -> bool;
    /// A one-line human-readable snapshot of register state, for the
    /// debugger's `z` command.
    fn debug_dump(&self) -> String;
}
