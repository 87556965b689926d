//! Frame-driver command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the main loop dispatches on. Malformed arguments for known commands are
//! reported on stderr and the line is dropped.

use std::fmt;
use std::time::Duration;

use crate::error::GameError;
use crate::grid::Coord;
use crate::tools::ToolKind;

/// A command operand naming a game entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `tile <row> <col>`
    Tile(Coord),
    /// `team <index>`
    Team(usize),
    /// `player <name>`
    Player(String),
}

impl Operand {
    /// The tile this operand names. Any other kind of operand is a type error.
    pub fn expect_tile(&self) -> Result<Coord, GameError> {
        match self {
            Operand::Tile(coord) => Ok(*coord),
            other => Err(GameError::InvalidArgumentType {
                expected: "tile",
                got: other.to_string(),
            }),
        }
    }

    /// The player name this operand names.
    pub fn expect_player(&self) -> Result<&str, GameError> {
        match self {
            Operand::Player(name) => Ok(name),
            other => Err(GameError::InvalidArgumentType {
                expected: "player",
                got: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Tile(c) => write!(f, "tile {} {}", c.row, c.col),
            Operand::Team(idx) => write!(f, "team {}", idx),
            Operand::Player(name) => write!(f, "player {}", name),
        }
    }
}

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the stock demo session.
    NewGame,

    /// Start a session from a JSON document on disk.
    Load { path: String },

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Process one frame; with the manual clock, `at` sets the time.
    Tick { at: Option<Duration> },

    /// Active player uses a tool slot against an operand.
    Use {
        tool: ToolKind,
        slot: usize,
        target: Operand,
    },

    /// Buys tools from the recipient's team balance; the recipient defaults
    /// to the active player.
    Buy {
        tool: ToolKind,
        quantity: usize,
        recipient: Option<Operand>,
    },

    /// Print the ownership map.
    Board,

    /// Print turn, money, and territory.
    Status,

    /// Print a snapshot of the session.
    Save,

    /// Replace the session with a snapshot.
    Restore { json: String },

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "newgame" => Some(Command::NewGame),
        "board" => Some(Command::Board),
        "status" => Some(Command::Status),
        "save" => Some(Command::Save),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),

        "load" => parse_load(&tokens),
        "setoption" => parse_setoption(&tokens),
        "tick" => parse_tick(&tokens),
        "use" => parse_use(&tokens),
        "buy" => parse_buy(&tokens),
        "restore" => parse_restore(trimmed),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `load <path>`.
fn parse_load(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        eprintln!("malformed load: expected 'load <path>'");
        return None;
    }
    Some(Command::Load {
        path: tokens[1..].join(" "),
    })
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                eprintln!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `tick [<seconds>]`.
fn parse_tick(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Tick { at: None }),
        Some(raw) => match raw.parse::<f64>().map(Duration::try_from_secs_f64) {
            Ok(Ok(at)) => Some(Command::Tick { at: Some(at) }),
            _ => {
                eprintln!("invalid tick time: '{}'", raw);
                None
            }
        },
    }
}

/// Parses an operand starting at `tokens[0]`.
fn parse_operand(tokens: &[&str]) -> Option<Operand> {
    match tokens {
        ["tile", row, col] => match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Some(Operand::Tile(Coord::new(row, col))),
            _ => {
                eprintln!("invalid tile coordinates: '{} {}'", row, col);
                None
            }
        },
        ["team", idx] => match idx.parse() {
            Ok(idx) => Some(Operand::Team(idx)),
            Err(_) => {
                eprintln!("invalid team index: '{}'", idx);
                None
            }
        },
        ["player", name] => Some(Operand::Player((*name).to_string())),
        _ => {
            eprintln!("malformed operand: expected 'tile <row> <col>', 'team <n>' or 'player <name>'");
            None
        }
    }
}

/// Parses `use <tool> <slot> <operand>`.
fn parse_use(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 4 {
        eprintln!("malformed use: expected 'use <tool> <slot> <operand>'");
        return None;
    }
    let slot = match tokens[2].parse::<usize>() {
        Ok(s) => s,
        Err(_) => {
            eprintln!("invalid tool slot: '{}'", tokens[2]);
            return None;
        }
    };
    let target = parse_operand(&tokens[3..])?;
    Some(Command::Use {
        tool: ToolKind::from_name(tokens[1]),
        slot,
        target,
    })
}

/// Parses `buy <tool> <quantity> [<operand>]`.
fn parse_buy(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 {
        eprintln!("malformed buy: expected 'buy <tool> <quantity> [<operand>]'");
        return None;
    }
    let quantity = match tokens[2].parse::<usize>() {
        Ok(q) => q,
        Err(_) => {
            eprintln!("invalid quantity: '{}'", tokens[2]);
            return None;
        }
    };
    let recipient = match &tokens[3..] {
        [] => None,
        rest => Some(parse_operand(rest)?),
    };
    Some(Command::Buy {
        tool: ToolKind::from_name(tokens[1]),
        quantity,
        recipient,
    })
}

/// Parses `restore <json>` -- everything after the keyword is the snapshot.
fn parse_restore(full_line: &str) -> Option<Command> {
    let json = full_line
        .strip_prefix("restore")
        .unwrap_or("")
        .trim()
        .to_string();
    if json.is_empty() {
        eprintln!("malformed restore: expected 'restore <snapshot json>'");
        return None;
    }
    Some(Command::Restore { json })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("board"), Some(Command::Board));
        assert_eq!(parse_command("status"), Some(Command::Status));
        assert_eq!(parse_command("save"), Some(Command::Save));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_load_path() {
        assert_eq!(
            parse_command("load /tmp/session.json"),
            Some(Command::Load {
                path: "/tmp/session.json".to_string()
            })
        );
        assert_eq!(parse_command("load"), None);
    }

    #[test]
    fn parse_setoption_with_and_without_value() {
        assert_eq!(
            parse_command("setoption name Clock value system"),
            Some(Command::SetOption {
                name: "Clock".to_string(),
                value: Some("system".to_string()),
            })
        );
        assert_eq!(
            parse_command("setoption name Reset"),
            Some(Command::SetOption {
                name: "Reset".to_string(),
                value: None,
            })
        );
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
    }

    #[test]
    fn parse_tick_variants() {
        assert_eq!(parse_command("tick"), Some(Command::Tick { at: None }));
        assert_eq!(
            parse_command("tick 30.5"),
            Some(Command::Tick {
                at: Some(Duration::from_millis(30_500))
            })
        );
        assert_eq!(parse_command("tick -1"), None);
        assert_eq!(parse_command("tick soon"), None);
    }

    #[test]
    fn parse_tick_rejects_unrepresentable_times() {
        assert_eq!(parse_command("tick 1e30"), None);
        assert_eq!(parse_command("tick NaN"), None);
        assert_eq!(parse_command("tick inf"), None);
    }

    #[test]
    fn parse_use_with_tile() {
        assert_eq!(
            parse_command("use dos 1 tile 2 3"),
            Some(Command::Use {
                tool: ToolKind::Dos,
                slot: 1,
                target: Operand::Tile(Coord::new(2, 3)),
            })
        );
    }

    #[test]
    fn parse_use_with_other_operands() {
        assert_eq!(
            parse_command("use ddos 0 team 2"),
            Some(Command::Use {
                tool: ToolKind::DDos,
                slot: 0,
                target: Operand::Team(2),
            })
        );
        assert_eq!(
            parse_command("use scout 0 player P1A"),
            Some(Command::Use {
                tool: ToolKind::Scripted("scout".to_string()),
                slot: 0,
                target: Operand::Player("P1A".to_string()),
            })
        );
    }

    #[test]
    fn parse_use_malformed_returns_none() {
        assert_eq!(parse_command("use dos"), None);
        assert_eq!(parse_command("use dos x tile 1 1"), None);
        assert_eq!(parse_command("use dos 0 tile 1"), None);
        assert_eq!(parse_command("use dos 0 tile a b"), None);
        assert_eq!(parse_command("use dos 0 castle 1"), None);
    }

    #[test]
    fn parse_buy_command() {
        assert_eq!(
            parse_command("buy ddos 2"),
            Some(Command::Buy {
                tool: ToolKind::DDos,
                quantity: 2,
                recipient: None,
            })
        );
        assert_eq!(
            parse_command("buy dos 1 player P1B"),
            Some(Command::Buy {
                tool: ToolKind::Dos,
                quantity: 1,
                recipient: Some(Operand::Player("P1B".to_string())),
            })
        );
        assert_eq!(parse_command("buy ddos"), None);
        assert_eq!(parse_command("buy ddos many"), None);
        assert_eq!(parse_command("buy ddos 1 player"), None);
    }

    #[test]
    fn parse_restore_keeps_json_intact() {
        let cmd = parse_command("restore {\"a\": [1, 2]}").unwrap();
        assert_eq!(
            cmd,
            Command::Restore {
                json: "{\"a\": [1, 2]}".to_string()
            }
        );
        assert_eq!(parse_command("restore"), None);
    }

    #[test]
    fn operand_type_check() {
        assert_eq!(
            Operand::Tile(Coord::new(1, 2)).expect_tile().unwrap(),
            Coord::new(1, 2)
        );
        let err = Operand::Team(1).expect_tile().unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidArgumentType { expected: "tile", ref got } if got == "team 1"
        ));
        assert_eq!(
            Operand::Player("P0A".to_string()).expect_player().unwrap(),
            "P0A"
        );
        assert!(matches!(
            Operand::Tile(Coord::new(0, 0)).expect_player(),
            Err(GameError::InvalidArgumentType { expected: "player", .. })
        ));
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  board  "), Some(Command::Board));
    }
}
