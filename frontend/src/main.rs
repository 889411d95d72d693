//! The process-level driver: parses CLI flags, loads ROM and (optionally)
//! a disk image into a fresh [`Apple2eSystem`], and hands control to the
//! debugger's command loop.

mod cli;
mod debugger;

use clap::Parser;
use phosphor_core::iwm::interleave::Interleave;
use phosphor_machines::Apple2eSystem;

fn main() {
    let cli = cli::Cli::parse();

    let mut sys = Apple2eSystem::new();

    match std::fs::read(&cli.rom) {
        Ok(bytes) => sys.load_rom(&bytes),
        Err(e) => {
            eprintln!("failed to load ROM '{}': {e}", cli.rom);
            std::process::exit(1);
        }
    }

    if let Some(disk_path) = &cli.disk {
        let interleave = cli.interleave.as_deref().and_then(parse_interleave);
        match std::fs::read(disk_path) {
            Ok(image) => {
                if let Err(e) = sys.load_disk(0, disk_path, image, interleave) {
                    eprintln!("failed to load disk '{disk_path}': {e}");
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("failed to load disk '{disk_path}': {e}");
                std::process::exit(1);
            }
        }
    }

    sys.warp = cli.warp;
    sys.reset();

    debugger::run(&mut sys, cli.break_on_entry);
}

/// Parse a disk-type override token (`dos`, `prodos`, `raw`), case
/// insensitive. Returns `None` for anything else so the caller falls back
/// to auto-detection.
pub(crate) fn parse_interleave(token: &str) -> Option<Interleave> {
    match token.to_ascii_lowercase().as_str() {
        "dos" | "dos33" => Some(Interleave::Dos33),
        "prodos" => Some(Interleave::ProDos),
        "raw" => Some(Interleave::Raw),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_interleave_tokens_case_insensitively() {
        assert_eq!(parse_interleave("DOS"), Some(Interleave::Dos33));
        assert_eq!(parse_interleave("prodos"), Some(Interleave::ProDos));
        assert_eq!(parse_interleave("Raw"), Some(Interleave::Raw));
        assert_eq!(parse_interleave("bogus"), None);
    }
}
