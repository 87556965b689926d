//! Engine state management.
//!
//! Holds the current session, the clock the frame driver samples, and
//! engine options. Each `handle_*` method executes one protocol command and
//! writes its response lines.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::error::GameError;
use crate::game::{GameModel, ManualClock, SystemClock, TimeSource, TurnChange};
use crate::protocol::render::{board_lines, status_lines, tool_line};
use crate::protocol::Operand;
use crate::session::{demo_session, SessionConfig, SessionSnapshot};
use crate::tools::ToolKind;

/// Option selecting the time source: `manual` (default) or `system`.
pub const CLOCK_OPTION: &str = "Clock";

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Option<GameModel>,
    pub options: HashMap<String, String>,
    manual: ManualClock,
    system: SystemClock,
    turns: Rc<RefCell<Vec<TurnChange>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with no session and the manual clock at zero.
    pub fn new() -> Self {
        Engine {
            game: None,
            options: HashMap::new(),
            manual: ManualClock::default(),
            system: SystemClock::new(),
            turns: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn uses_system_clock(&self) -> bool {
        self.options
            .get(CLOCK_OPTION)
            .is_some_and(|v| v.eq_ignore_ascii_case("system"))
    }

    /// Current time according to the selected clock.
    pub fn now(&self) -> Duration {
        if self.uses_system_clock() {
            self.system.now()
        } else {
            self.manual.now()
        }
    }

    /// Sets an engine option.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        self.options.insert(name, value.unwrap_or_default());
    }

    /// Installs `game` as the current session and hooks turn notifications.
    fn install(&mut self, mut game: GameModel) {
        self.turns.borrow_mut().clear();
        let sink = Rc::clone(&self.turns);
        game.subscribe(Box::new(move |change: &TurnChange| {
            sink.borrow_mut().push(*change)
        }));
        self.game = Some(game);
    }

    /// Starts the stock demo session.
    pub fn new_game(&mut self) -> Result<(), GameError> {
        let game = demo_session().build(self.now())?;
        self.install(game);
        Ok(())
    }

    /// Starts a session from a JSON document.
    pub fn load(&mut self, path: &Path) -> Result<(), GameError> {
        let game = SessionConfig::from_path(path)?.build(self.now())?;
        self.install(game);
        Ok(())
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Reports a failed command to the driver.
    pub fn report_error<W: Write>(&self, err: &GameError, out: &mut W) -> io::Result<()> {
        writeln!(out, "error {}", err)?;
        out.flush()
    }

    fn no_game<W: Write>(out: &mut W) -> io::Result<()> {
        writeln!(out, "error no game in progress")?;
        out.flush()
    }

    /// Handles `tick`: samples the clock, lets the game rotate its turn, and
    /// announces any rotation with the new player's tools.
    pub fn handle_tick<W: Write>(&mut self, at: Option<Duration>, out: &mut W) -> io::Result<()> {
        if let Some(at) = at {
            if self.uses_system_clock() {
                eprintln!("tick: explicit time ignored with the system clock");
            } else {
                self.manual.set(at);
            }
        }
        let now = self.now();
        let game = match self.game.as_mut() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        game.tick(now);

        let changes: Vec<TurnChange> = self.turns.borrow_mut().drain(..).collect();
        for change in changes {
            let r = game.rotation()[change.active];
            let name = game.player(r).map(|p| p.name().to_string()).unwrap_or_default();
            writeln!(
                out,
                "info turn {} player {} team {}",
                change.active, name, r.team
            )?;
            writeln!(out, "info {}", tool_line(game))?;
        }
        writeln!(out, "tickok")?;
        out.flush()
    }

    /// Handles `use`: the active player tries a tool against a tile operand.
    pub fn handle_use<W: Write>(
        &mut self,
        tool: &ToolKind,
        slot: usize,
        target: &Operand,
        out: &mut W,
    ) -> io::Result<()> {
        let game = match self.game.as_mut() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        let result = target
            .expect_tile()
            .and_then(|coord| game.use_active_tool(tool, slot, coord));
        match result {
            Ok(used) => {
                if used {
                    game.refresh_colors();
                }
                writeln!(out, "used {}", used)?;
                out.flush()
            }
            Err(e) => self.report_error(&e, out),
        }
    }

    /// Handles `buy`: purchases tools for a named player, or for the active
    /// player when no recipient is given.
    pub fn handle_buy<W: Write>(
        &mut self,
        tool: &ToolKind,
        quantity: usize,
        recipient: Option<&Operand>,
        out: &mut W,
    ) -> io::Result<()> {
        let game = match self.game.as_mut() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        let buyer = match recipient {
            None => Ok(game.active_ref()),
            Some(operand) => operand.expect_player().and_then(|name| {
                game.find_player(name).ok_or_else(|| {
                    GameError::InvalidArgumentValue(format!("unknown player '{}'", name))
                })
            }),
        };
        match buyer.and_then(|buyer| game.purchase_tools(buyer, tool, quantity)) {
            Ok(price) => {
                writeln!(out, "bought {} {} for {}", quantity, tool, price)?;
                out.flush()
            }
            Err(e) => self.report_error(&e, out),
        }
    }

    /// Handles `board`: the ownership map, one line per row.
    pub fn handle_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let game = match self.game.as_ref() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        for line in board_lines(game) {
            writeln!(out, "board {}", line)?;
        }
        writeln!(out, "boardok")?;
        out.flush()
    }

    /// Handles `status`.
    pub fn handle_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let game = match self.game.as_ref() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        for line in status_lines(game, self.now()) {
            writeln!(out, "status {}", line)?;
        }
        writeln!(out, "status {}", tool_line(game))?;
        writeln!(out, "statusok")?;
        out.flush()
    }

    /// Handles `save`: a single-line JSON snapshot.
    pub fn handle_save<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let game = match self.game.as_ref() {
            Some(g) => g,
            None => return Self::no_game(out),
        };
        match SessionSnapshot::capture(game, self.now()).to_json() {
            Ok(json) => {
                writeln!(out, "snapshot {}", json)?;
                out.flush()
            }
            Err(e) => self.report_error(&e, out),
        }
    }

    /// Handles `restore`: replaces the session with a snapshot.
    pub fn handle_restore<W: Write>(&mut self, json: &str, out: &mut W) -> io::Result<()> {
        let restored =
            SessionSnapshot::from_json(json).and_then(|snap| snap.restore(self.now()));
        match restored {
            Ok(game) => {
                self.install(game);
                writeln!(out, "restoreok")?;
                out.flush()
            }
            Err(e) => self.report_error(&e, out),
        }
    }
}
