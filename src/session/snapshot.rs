//! Persisted session state.
//!
//! A snapshot holds enough to rebuild a `GameModel` exactly: grid size and
//! tile state, team money and rosters, every tool instance with its
//! remaining uses, and the position and phase of the turn rotation.
//! Restoring is a validated construction step, like building from a
//! `SessionConfig`.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{GameConfig, GameModel, TurnState};
use crate::grid::{Coord, BASE_RESISTANCE};
use crate::team::{Money, Player, Team, TeamId};
use crate::tools::{PressureToolSet, ScriptedToolDef, ToolKind};

use super::config::{build_catalog, parse_color, team_id};

/// Remaining uses of every instance of one tool variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStack {
    pub kind: ToolKind,
    pub remaining: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub tools: Vec<ToolStack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub name: String,
    pub color: String,
    pub money: Money,
    pub players: Vec<PlayerSnapshot>,
}

/// A tile that differs from a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub row: usize,
    pub col: usize,
    pub owner: Option<u8>,
    pub resistance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub turn_period: Duration,
    pub money_limit: Money,
    #[serde(default)]
    pub tools: Vec<ScriptedToolDef>,
    pub teams: Vec<TeamSnapshot>,
    pub tiles: Vec<TileSnapshot>,
    pub active_index: usize,
    /// Time already spent in the current turn.
    pub turn_elapsed: Duration,
    pub turn_number: u64,
}

impl SessionSnapshot {
    /// Records `game` as it stands at time `now`.
    pub fn capture(game: &GameModel, now: Duration) -> Self {
        let teams = game
            .teams()
            .iter()
            .map(|team| TeamSnapshot {
                name: team.name().to_string(),
                color: team.color().to_hex(),
                money: team.money(),
                players: team
                    .players()
                    .iter()
                    .map(|player| PlayerSnapshot {
                        name: player.name().to_string(),
                        tools: player
                            .inventory()
                            .map(|(kind, sets)| ToolStack {
                                kind: kind.clone(),
                                remaining: sets.iter().map(PressureToolSet::count).collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let tiles = game
            .grid()
            .tiles()
            .filter(|t| t.owner().is_some() || t.resistance() != BASE_RESISTANCE)
            .map(|t| TileSnapshot {
                row: t.coord().row,
                col: t.coord().col,
                owner: t.owner().map(|id| id.0),
                resistance: t.resistance(),
            })
            .collect();

        let turn = game.turn_state();

        Self {
            title: game.title().to_string(),
            width: game.grid().width(),
            height: game.grid().height(),
            turn_period: game.turn_period(),
            money_limit: game.money_limit(),
            tools: game.catalog().scripted_defs(),
            teams,
            tiles,
            active_index: turn.active,
            turn_elapsed: game.turn_elapsed(now),
            turn_number: turn.turn_number,
        }
    }

    /// Rebuilds the game so that the current turn resumes at `now` with the
    /// recorded time already elapsed.
    pub fn restore(&self, now: Duration) -> Result<GameModel, GameError> {
        let catalog = build_catalog(&self.tools)?;

        let mut teams = Vec::with_capacity(self.teams.len());
        for (idx, ts) in self.teams.iter().enumerate() {
            let id = team_id(idx)?;
            let mut team = Team::new(id, ts.name.clone(), parse_color(&ts.color)?);
            team.set_money(ts.money, self.money_limit)?;
            for ps in &ts.players {
                let mut player = Player::new(ps.name.clone(), id);
                for stack in &ps.tools {
                    let prototype = catalog.prototype(&stack.kind)?;
                    player.add_tool_sets(&prototype, stack.remaining.iter().copied())?;
                }
                team.add_player(player)?;
            }
            teams.push(team);
        }

        let config = GameConfig {
            title: self.title.clone(),
            teams,
            grid_width: self.width,
            grid_height: self.height,
            turn_period: self.turn_period,
            money_limit: self.money_limit,
            catalog,
        };
        let mut game = GameModel::new(config, now)?;

        let team_count = game.teams().len();
        let mut seen = BTreeSet::new();
        for ts in &self.tiles {
            let coord = Coord::new(ts.row, ts.col);
            if !seen.insert(coord) {
                return Err(GameError::DuplicateEntity(format!("tile {}", coord)));
            }
            if ts.resistance == 0 || ts.resistance > BASE_RESISTANCE {
                return Err(GameError::InvalidArgumentValue(format!(
                    "tile {} resistance {} outside 1..={}",
                    coord, ts.resistance, BASE_RESISTANCE
                )));
            }
            let owner = match ts.owner {
                Some(idx) if usize::from(idx) >= team_count => {
                    return Err(GameError::InvalidArgumentValue(format!(
                        "tile {} owned by unknown team {}",
                        coord, idx
                    )));
                }
                other => other.map(TeamId),
            };
            game.grid_mut().tile_mut(coord)?.restore(owner, ts.resistance);
        }

        game.restore_turn(TurnState {
            active: self.active_index,
            started_at: now,
            carried: self.turn_elapsed,
            turn_number: self.turn_number,
        })?;
        game.refresh_colors();
        Ok(game)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::demo_session;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn played_game() -> GameModel {
        let mut game = demo_session().build(secs(0)).unwrap();
        game.use_active_tool(&ToolKind::Dos, 0, Coord::new(3, 3)).unwrap();
        game.use_active_tool(&ToolKind::DDos, 0, Coord::new(1, 0)).unwrap();
        game.deposit(TeamId(2), 120).unwrap();
        game.tick(secs(30));
        game.tick(secs(60));
        game.refresh_colors();
        game
    }

    #[test]
    fn capture_records_changed_tiles_only() {
        let game = played_game();
        let snap = SessionSnapshot::capture(&game, secs(70));
        assert_eq!(snap.tiles.len(), 4);
        assert_eq!(snap.active_index, 2);
        assert_eq!(snap.turn_elapsed, secs(10));
        assert_eq!(snap.turn_number, 2);
        assert_eq!(snap.teams[2].money, 120);
        let p0a = &snap.teams[0].players[0];
        assert_eq!(
            p0a.tools,
            vec![
                ToolStack {
                    kind: ToolKind::Dos,
                    remaining: vec![0, 1]
                },
                ToolStack {
                    kind: ToolKind::DDos,
                    remaining: vec![0]
                },
            ]
        );
    }

    #[test]
    fn restore_reproduces_game_state() {
        let game = played_game();
        let snap = SessionSnapshot::capture(&game, secs(70));
        let json = snap.to_json().unwrap();

        let restored = SessionSnapshot::from_json(&json)
            .unwrap()
            .restore(secs(500))
            .unwrap();
        assert_eq!(restored.grid(), game.grid());
        assert_eq!(restored.teams(), game.teams());
        assert_eq!(restored.active_index(), 2);
        assert_eq!(restored.turn_remaining(secs(500)), secs(20));
        assert_eq!(SessionSnapshot::capture(&restored, secs(500)), snap);
    }

    #[test]
    fn restored_turn_resumes_mid_phase() {
        let game = played_game();
        let snap = SessionSnapshot::capture(&game, secs(70));
        let mut restored = snap.restore(secs(1000)).unwrap();
        assert_eq!(restored.tick(secs(1019)), None);
        assert_eq!(restored.tick(secs(1020)).map(|c| c.active), Some(3));
    }

    #[test]
    fn restore_at_earlier_clock_keeps_time_left() {
        let game = demo_session().build(secs(100)).unwrap();
        let snap = SessionSnapshot::capture(&game, secs(120));
        let mut restored = snap.restore(secs(5)).unwrap();
        assert_eq!(restored.turn_remaining(secs(5)), secs(10));
        assert_eq!(restored.tick(secs(14)), None);
        assert_eq!(restored.tick(secs(15)).map(|c| c.active), Some(1));
    }

    #[test]
    fn fractional_period_survives_roundtrip() {
        let mut config = demo_session();
        config.turn_period_secs = 0.0005;
        let game = config.build(secs(0)).unwrap();
        let now = Duration::from_micros(300);
        let json = SessionSnapshot::capture(&game, now).to_json().unwrap();

        let restored = SessionSnapshot::from_json(&json)
            .unwrap()
            .restore(secs(0))
            .unwrap();
        assert_eq!(restored.turn_period(), Duration::from_micros(500));
        assert_eq!(restored.turn_remaining(secs(0)), Duration::from_micros(200));
    }

    #[test]
    fn restore_rejects_oversized_documents() {
        let game = played_game();
        let base = SessionSnapshot::capture(&game, secs(70));

        let mut snap = base.clone();
        snap.width = usize::MAX;
        snap.height = 2;
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::InvalidArgumentValue(_))
        ));

        let mut snap = base.clone();
        snap.teams[0].players[0].tools[0].remaining = vec![1; crate::team::MAX_TOOL_INSTANCES + 1];
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::InvalidArgumentValue(_))
        ));

        let mut snap = base;
        snap.turn_period = Duration::ZERO;
        assert!(snap.restore(secs(0)).is_err());
    }

    #[test]
    fn restore_rejects_bad_tiles() {
        let game = played_game();
        let base = SessionSnapshot::capture(&game, secs(70));

        let mut snap = base.clone();
        snap.tiles.push(snap.tiles[0]);
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::DuplicateEntity(_))
        ));

        let mut snap = base.clone();
        snap.tiles[0].owner = Some(9);
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::InvalidArgumentValue(_))
        ));

        let mut snap = base.clone();
        snap.tiles[0].resistance = 0;
        assert!(snap.restore(secs(0)).is_err());

        let mut snap = base;
        snap.tiles[0].row = 40;
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::OutOfRange { .. })
        ));
    }

    #[test]
    fn restore_rejects_bad_turn_and_money() {
        let game = played_game();
        let base = SessionSnapshot::capture(&game, secs(70));

        let mut snap = base.clone();
        snap.active_index = 6;
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::InvalidArgumentValue(_))
        ));

        let mut snap = base;
        snap.teams[0].money = 5000;
        assert!(matches!(
            snap.restore(secs(0)),
            Err(GameError::InvariantViolation(_))
        ));
    }
}
