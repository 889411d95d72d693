//! The interactive command loop: single-line commands read from stdin
//! while paused, plus a non-blocking 'q' watch during `c` (continue) so a
//! running emulation can be interrupted back to the prompt without the
//! user needing to send a line.

use std::io::{self, Write};

use phosphor_machines::Apple2eSystem;
use termion::input::TermRead;
use termion::raw::IntoRawMode;

use crate::parse_interleave;

/// Parse a hex address, accepting an optional `$` or `0x` prefix.
fn parse_addr(s: &str) -> Option<u16> {
    let s = s.trim();
    let s = s.strip_prefix('$').or_else(|| s.strip_prefix("0x")).unwrap_or(s);
    u16::from_str_radix(s, 16).ok()
}

fn prompt_line() -> Option<String> {
    print!("apple2e> ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    let n = io::stdin().read_line(&mut line).ok()?;
    if n == 0 {
        return None; // EOF
    }
    Some(line.trim().to_string())
}

/// Run the CPU until `break_requested` flips or the user presses `q`
/// without waiting for a newline. Raw mode is scoped to this call so the
/// rest of the debugger can keep using ordinary line-buffered input.
fn run_continue(sys: &mut Apple2eSystem) {
    let _raw = io::stdout().into_raw_mode();
    let mut keys = termion::async_stdin().keys();
    sys.break_requested = false;
    loop {
        sys.step();
        if sys.break_requested {
            break;
        }
        if let Some(Ok(termion::event::Key::Char('q'))) = keys.next() {
            println!("\r\n[interrupted]\r");
            break;
        }
    }
}

/// Drive the command loop until the user quits. Returns when `q` is
/// entered at the prompt.
pub fn run(sys: &mut Apple2eSystem, start_in_debugger: bool) {
    if !start_in_debugger {
        run_continue(sys);
        report_stop(sys);
    }

    loop {
        let Some(line) = prompt_line() else {
            return;
        };
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("q") => return,
            Some("c") => {
                run_continue(sys);
                report_stop(sys);
            }
            Some("s") => {
                sys.step();
                report_stop(sys);
            }
            Some("w") => {
                sys.warp = !sys.warp;
                println!("warp = {}", sys.warp);
            }
            Some("f") => {
                let Some(path) = parts.next() else {
                    println!("usage: f FILE [TYPE]");
                    continue;
                };
                let interleave = parts.next().and_then(parse_interleave);
                match std::fs::read(path) {
                    Ok(image) => match sys.load_disk(0, path, image, interleave) {
                        Ok(()) => println!("loaded {path} into drive 0"),
                        Err(e) => println!("error: {e}"),
                    },
                    Err(e) => println!("error: {e}"),
                }
            }
            Some("t") => print!("{}", sys.dump_trace()),
            Some("d") => dump_range(parts, |s, a, b| s.dump_main(a, b), sys),
            Some("a") => dump_range(parts, |s, a, b| s.dump_aux(a, b), sys),
            Some("m") => println!("{}", sys.dump_switches()),
            Some("b") => match parts.next().and_then(parse_addr) {
                Some(addr) => {
                    sys.breakpoint = Some(addr);
                    println!("breakpoint set at ${addr:04x}");
                }
                None => {
                    sys.breakpoint = None;
                    println!("breakpoint cleared");
                }
            },
            Some("r") => {
                sys.reset();
                println!("reset; PC=${:04x}", sys.cpu.pc);
            }
            Some("i") => println!("{}", sys.dump_iwm()),
            Some("z") => println!("{}", sys.dump_acia()),
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }
    }
}

fn report_stop(sys: &Apple2eSystem) {
    if let Some(msg) = &sys.panic_message {
        println!("stopped: {msg} (PC=${:04x})", sys.cpu.pc);
    } else if sys.break_requested {
        println!("breakpoint hit at ${:04x}", sys.cpu.pc);
    }
}

fn dump_range(
    mut parts: std::str::SplitWhitespace,
    reader: impl Fn(&Apple2eSystem, u16, u16) -> &[u8],
    sys: &Apple2eSystem,
) {
    let Some(start) = parts.next().and_then(parse_addr) else {
        println!("usage: d|a ADDR [END]");
        return;
    };
    let end = parts.next().and_then(parse_addr).unwrap_or(start);
    if end < start {
        println!("END must not be before ADDR");
        return;
    }
    for (offset, byte) in reader(sys, start, end).iter().enumerate() {
        if offset % 16 == 0 {
            if offset != 0 {
                println!();
            }
            print!("{:04x}:", start.wrapping_add(offset as u16));
        }
        print!(" {byte:02x}");
    }
    println!();
}
