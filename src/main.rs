//! pressurefront -- frame driver for the grid conquest engine.
//!
//! Reads commands from stdin and writes responses to stdout, one command
//! per line. Each `tick` is one frame: the driver samples the clock and the
//! game rotates the active player when the turn period has elapsed.

use std::io::{self, BufRead};
use std::path::Path;

use pressurefront::engine::Engine;
use pressurefront::protocol::parser::{parse_command, Command};

/// Runs the main protocol loop until `quit`, end of input, or a write failure.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let written = match cmd {
            Command::NewGame => match engine.new_game() {
                Ok(()) => Ok(()),
                Err(e) => engine.report_error(&e, &mut out),
            },
            Command::Load { path } => match engine.load(Path::new(&path)) {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("load {}: {}", path, e);
                    engine.report_error(&e, &mut out)
                }
            },
            Command::SetOption { name, value } => {
                engine.set_option(name, value);
                Ok(())
            }
            Command::Tick { at } => engine.handle_tick(at, &mut out),
            Command::Use { tool, slot, target } => {
                engine.handle_use(&tool, slot, &target, &mut out)
            }
            Command::Buy {
                tool,
                quantity,
                recipient,
            } => engine.handle_buy(&tool, quantity, recipient.as_ref(), &mut out),
            Command::Board => engine.handle_board(&mut out),
            Command::Status => engine.handle_status(&mut out),
            Command::Save => engine.handle_save(&mut out),
            Command::Restore { json } => engine.handle_restore(&json, &mut out),
            Command::IsReady => engine.handle_isready(&mut out),
            Command::Quit => break,
        };

        if let Err(e) = written {
            eprintln!("output error: {}", e);
            break;
        }
    }
}
