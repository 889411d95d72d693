use std::fmt;

/// Errors raised by the hard core (CPU, memory, IWM). All are non-fatal at
/// the instruction level: the driver sets a panic message, breaks into the
/// debugger, and lets the operator decide whether to continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// ROM or disk image could not be opened or read.
    IoLoadFailed(String),
    /// CPU wrote to language-card RAM while `wp` was set.
    WriteProtected { address: u16, value: u8 },
    /// CPU executed STP or WAI.
    UnimplementedOpcode { opcode: u8, pc: u16 },
    /// BBS7 encountered with operand pattern $FF $FF $FF — likely a runaway
    /// into unmapped memory.
    SuspiciousCode { pc: u16 },
    /// Invalid drive index on disk load (only 0 and 1 exist).
    DisksError { drive: usize },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::IoLoadFailed(msg) => write!(f, "I/O load failed: {msg}"),
            CoreError::WriteProtected { address, value } => write!(
                f,
                "write protected RAM address ${address:04x} (${value:02x})"
            ),
            CoreError::UnimplementedOpcode { opcode, pc } => write!(
                f,
                "unimplemented opcode ${opcode:02x} at PC=${pc:04x}"
            ),
            CoreError::SuspiciousCode { pc } => {
                write!(f, "suspicious code (BBS7 on $FF $FF $FF) at PC=${pc:04x}")
            }
            CoreError::DisksError { drive } => write!(f, "invalid drive index {drive}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::IoLoadFailed(err.to_string())
    }
}
