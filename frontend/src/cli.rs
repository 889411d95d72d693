//! Command-line flags: `-r` ROM path, `-t` disk image, `-b` break-on-entry,
//! `-w` warp mode, `-s` interleave override.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "phosphor", about = "An Apple //e emulation core")]
pub struct Cli {
    /// Path to a raw ROM image (up to 32 KiB).
    #[arg(short = 'r', long = "rom", default_value = "rom_ff.bin")]
    pub rom: String,

    /// Path to a 143,360-byte 5.25" disk image loaded into drive 0.
    #[arg(short = 't', long = "disk")]
    pub disk: Option<String>,

    /// Force a sector interleave instead of auto-detecting it: dos, prodos, or raw.
    #[arg(short = 's', long = "interleave")]
    pub interleave: Option<String>,

    /// Drop into the debugger before the first instruction runs.
    #[arg(short = 'b', long = "break")]
    pub break_on_entry: bool,

    /// Run without the ~1MHz pacing delay.
    #[arg(short = 'w', long = "warp")]
    pub warp: bool,
}
