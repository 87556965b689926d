//! Session documents and the builder that turns them into a `GameModel`.
//!
//! A `SessionConfig` is untrusted input (typically a JSON file). Building it
//! validates every field; the core only ever sees the validated result.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{GameConfig, GameModel};
use crate::grid::Coord;
use crate::team::{Color, Money, Player, Team, TeamId};
use crate::tools::{ScriptedToolDef, ToolCatalog, ToolKind};

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

/// A player and the tools it starts with, keyed by tool name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub tools: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    #[serde(default)]
    pub money: Money,
    pub players: Vec<PlayerConfig>,
}

/// A tile handed to a team before play starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub team: usize,
    pub row: usize,
    pub col: usize,
}

/// Full composition of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub title: String,
    pub grid: GridConfig,
    pub turn_period_secs: f64,
    pub money_limit: Money,
    #[serde(default)]
    pub tools: Vec<ScriptedToolDef>,
    pub teams: Vec<TeamConfig>,
    #[serde(default)]
    pub seeds: Vec<SeedConfig>,
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, GameError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the document and builds the game, first turn starting at `now`.
    pub fn build(&self, now: Duration) -> Result<GameModel, GameError> {
        let catalog = build_catalog(&self.tools)?;

        let mut teams = Vec::with_capacity(self.teams.len());
        for (idx, tc) in self.teams.iter().enumerate() {
            let id = team_id(idx)?;
            let mut team = Team::new(id, tc.name.clone(), parse_color(&tc.color)?);
            team.set_money(tc.money, self.money_limit)?;
            for pc in &tc.players {
                let mut player = Player::new(pc.name.clone(), id);
                for (tool, &quantity) in &pc.tools {
                    let prototype = catalog.prototype(&ToolKind::from_name(tool))?;
                    player.add_pressure_tools(&prototype, quantity)?;
                }
                team.add_player(player)?;
            }
            teams.push(team);
        }

        let config = GameConfig {
            title: self.title.clone(),
            teams,
            grid_width: self.grid.width,
            grid_height: self.grid.height,
            turn_period: turn_period(self.turn_period_secs)?,
            money_limit: self.money_limit,
            catalog,
        };
        let mut game = GameModel::new(config, now)?;
        for seed in &self.seeds {
            game.conquer(Coord::new(seed.row, seed.col), team_id(seed.team)?)?;
        }
        game.refresh_colors();
        Ok(game)
    }
}

/// The stock three-team session: 6x6 grid, two players per team, each with
/// one `ddos` and two `dos`, 30 second turns.
pub fn demo_session() -> SessionConfig {
    let colors = ["#d23c3c", "#3cb44b", "#4363d8"];
    let teams = ["A", "B", "C"]
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (name, color))| TeamConfig {
            name: (*name).to_string(),
            color: color.to_string(),
            money: 0,
            players: ["A", "B"]
                .iter()
                .map(|suffix| PlayerConfig {
                    name: format!("P{}{}", i, suffix),
                    tools: BTreeMap::from([("ddos".to_string(), 1), ("dos".to_string(), 2)]),
                })
                .collect(),
        })
        .collect();

    SessionConfig {
        title: "Hardcoded session".to_string(),
        grid: GridConfig {
            width: 6,
            height: 6,
        },
        turn_period_secs: 30.0,
        money_limit: 999,
        tools: Vec::new(),
        teams,
        seeds: (0..3)
            .map(|i| SeedConfig {
                team: i,
                row: i,
                col: 0,
            })
            .collect(),
    }
}

pub(crate) fn build_catalog(defs: &[ScriptedToolDef]) -> Result<ToolCatalog, GameError> {
    let mut catalog = ToolCatalog::new();
    for def in defs {
        catalog.register(def)?;
    }
    Ok(catalog)
}

pub(crate) fn team_id(idx: usize) -> Result<TeamId, GameError> {
    u8::try_from(idx)
        .map(TeamId)
        .map_err(|_| GameError::InvalidArgumentValue(format!("team index {} is too large", idx)))
}

pub(crate) fn parse_color(s: &str) -> Result<Color, GameError> {
    Color::from_hex(s)
        .ok_or_else(|| GameError::InvalidArgumentValue(format!("invalid team color '{}'", s)))
}

/// Converts the document's seconds; zero and the upper bound are checked
/// by the scheduler.
fn turn_period(secs: f64) -> Result<Duration, GameError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        GameError::InvalidArgumentValue(format!(
            "turn period must be a positive number of seconds, got {}",
            secs
        ))
    })
}
