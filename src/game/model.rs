//! Top-level game state.
//!
//! `GameModel` owns the grid and the teams (which own their players) and
//! runs the turn rotation. Everything else refers to teams and players by
//! id: `TeamId` for teams, `PlayerRef` (team + slot) for players.

use std::fmt;
use std::time::Duration;

use crate::error::GameError;
use crate::grid::{Coord, GridModel, GridTile, OwnershipSummary};
use crate::team::{Money, Player, Team, TeamId};
use crate::tools::{PressureTool, ToolCatalog, ToolKind};

use super::turn::{TurnChange, TurnObserver, TurnScheduler, TurnState};

/// Non-owning reference to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerRef {
    pub team: TeamId,
    pub slot: usize,
}

/// Everything needed to construct a game. Teams arrive fully formed.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    pub teams: Vec<Team>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub turn_period: Duration,
    pub money_limit: Money,
    pub catalog: ToolCatalog,
}

/// A running session.
pub struct GameModel {
    title: String,
    grid: GridModel,
    teams: Vec<Team>,
    rotation: Vec<PlayerRef>,
    turn: TurnScheduler,
    money_limit: Money,
    catalog: ToolCatalog,
    observers: Vec<Box<dyn TurnObserver>>,
}

impl fmt::Debug for GameModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameModel")
            .field("title", &self.title)
            .field("grid", &self.grid)
            .field("teams", &self.teams)
            .field("rotation", &self.rotation)
            .field("turn", &self.turn)
            .field("money_limit", &self.money_limit)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl GameModel {
    /// Builds a game whose first turn starts at `now`.
    ///
    /// Team ids must match their position in `teams`, every balance must fit
    /// the money limit, and player names must be unique across all teams.
    /// The rotation visits players team by team in registration order.
    pub fn new(config: GameConfig, now: Duration) -> Result<Self, GameError> {
        if config.teams.is_empty() {
            return Err(GameError::InvalidArgumentValue(
                "a game needs at least one team".to_string(),
            ));
        }
        if config.teams.len() > usize::from(u8::MAX) + 1 {
            return Err(GameError::InvalidArgumentValue(format!(
                "too many teams: {}",
                config.teams.len()
            )));
        }

        let mut rotation = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        for (idx, team) in config.teams.iter().enumerate() {
            if team.id().index() != idx {
                return Err(GameError::InvalidArgumentValue(format!(
                    "team '{}' has id {} but sits at position {}",
                    team.name(),
                    team.id(),
                    idx
                )));
            }
            if team.money() > config.money_limit {
                return Err(GameError::InvariantViolation(format!(
                    "team '{}' starts with {} above the money limit {}",
                    team.name(),
                    team.money(),
                    config.money_limit
                )));
            }
            for (slot, player) in team.players().iter().enumerate() {
                if names.contains(&player.name()) {
                    return Err(GameError::DuplicateEntity(format!(
                        "player '{}' is registered more than once",
                        player.name()
                    )));
                }
                names.push(player.name());
                rotation.push(PlayerRef {
                    team: team.id(),
                    slot,
                });
            }
        }

        let grid = GridModel::new(config.grid_width, config.grid_height)?;
        let turn = TurnScheduler::new(config.turn_period, rotation.len(), now)?;

        Ok(Self {
            title: config.title,
            grid,
            teams: config.teams,
            rotation,
            turn,
            money_limit: config.money_limit,
            catalog: config.catalog,
            observers: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn tile(&self, coord: Coord) -> Result<&GridTile, GameError> {
        self.grid.tile(coord)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, GameError> {
        self.teams.get(id.index()).ok_or_else(|| unknown_team(id))
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, GameError> {
        self.teams.get_mut(id.index()).ok_or_else(|| unknown_team(id))
    }

    pub fn money_limit(&self) -> Money {
        self.money_limit
    }

    pub fn turn_period(&self) -> Duration {
        self.turn.period()
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn.state()
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Players in turn order.
    pub fn rotation(&self) -> &[PlayerRef] {
        &self.rotation
    }

    pub fn active_index(&self) -> usize {
        self.turn.active()
    }

    pub fn active_ref(&self) -> PlayerRef {
        self.rotation[self.turn.active()]
    }

    pub fn active_player(&self) -> &Player {
        let r = self.active_ref();
        &self.teams[r.team.index()].players()[r.slot]
    }

    pub fn player(&self, r: PlayerRef) -> Result<&Player, GameError> {
        self.team(r.team)?
            .player(r.slot)
            .ok_or_else(|| unknown_player(r))
    }

    /// Finds a player by name.
    pub fn find_player(&self, name: &str) -> Option<PlayerRef> {
        self.rotation
            .iter()
            .copied()
            .find(|r| self.teams[r.team.index()].players()[r.slot].name() == name)
    }

    /// Time spent in the current turn.
    pub fn turn_elapsed(&self, now: Duration) -> Duration {
        self.turn.elapsed(now)
    }

    /// Time left in the current turn.
    pub fn turn_remaining(&self, now: Duration) -> Duration {
        self.turn.remaining(now)
    }

    /// Registers a hook called after every turn rotation.
    pub fn subscribe(&mut self, observer: Box<dyn TurnObserver>) {
        self.observers.push(observer);
    }

    /// Processes one driver frame: rotates the turn if its period has
    /// elapsed by `now`.
    pub fn tick(&mut self, now: Duration) -> Option<TurnChange> {
        let change = self.turn.poll(now)?;
        self.notify(&change);
        Some(change)
    }

    /// Hands the turn to the next player and notifies observers.
    pub fn next_player_turn(&mut self, now: Duration) -> TurnChange {
        let change = self.turn.advance(now);
        self.notify(&change);
        change
    }

    fn notify(&mut self, change: &TurnChange) {
        for observer in &mut self.observers {
            observer.turn_changed(change);
        }
    }

    /// Assigns a tile to a team outright. Used for seeding.
    pub fn conquer(&mut self, coord: Coord, team: TeamId) -> Result<(), GameError> {
        if team.index() >= self.teams.len() {
            return Err(GameError::InvalidArgumentValue(format!(
                "team index {} outside 0..{}",
                team,
                self.teams.len()
            )));
        }
        self.grid.tile_mut(coord)?.conquer(team);
        Ok(())
    }

    /// Uses one of `player`'s tool instances against the tile at `target`.
    ///
    /// `Ok(false)` means the tool could not be used (depleted, or the policy
    /// declined the target). Tool cost is not charged here.
    pub fn use_tool(
        &mut self,
        player: PlayerRef,
        kind: &ToolKind,
        slot: usize,
        target: Coord,
    ) -> Result<bool, GameError> {
        let tile = self.grid.tile_mut(target)?;
        let team = self
            .teams
            .get_mut(player.team.index())
            .ok_or_else(|| unknown_team(player.team))?;
        let holder = team
            .player_mut(player.slot)
            .ok_or_else(|| unknown_player(player))?;
        let set = holder.tool_mut(kind, slot).ok_or_else(|| {
            GameError::InvalidArgumentValue(format!(
                "player {} of team {} holds no {} in slot {}",
                player.slot, player.team, kind, slot
            ))
        })?;
        set.try_use(tile)
    }

    /// `use_tool` for whoever's turn it is.
    pub fn use_active_tool(
        &mut self,
        kind: &ToolKind,
        slot: usize,
        target: Coord,
    ) -> Result<bool, GameError> {
        let active = self.active_ref();
        self.use_tool(active, kind, slot, target)
    }

    pub fn deposit(&mut self, team: TeamId, amount: Money) -> Result<Money, GameError> {
        let limit = self.money_limit;
        self.team_mut(team)?.deposit(amount, limit)
    }

    pub fn withdraw(&mut self, team: TeamId, amount: Money) -> Result<Money, GameError> {
        self.team_mut(team)?.withdraw(amount)
    }

    /// Buys `quantity` instances of `kind` for `player`, paid from the team
    /// balance. Nothing changes if the team cannot afford them or the
    /// player has no room for them.
    pub fn purchase_tools(
        &mut self,
        player: PlayerRef,
        kind: &ToolKind,
        quantity: usize,
    ) -> Result<Money, GameError> {
        let prototype = self.catalog.prototype(kind)?;
        self.player(player)?.check_room(kind, quantity)?;
        let price = u32::try_from(quantity)
            .ok()
            .and_then(|q| prototype.cost().checked_mul(q))
            .ok_or_else(|| {
                GameError::InvalidArgumentValue(format!("quantity {} is too large", quantity))
            })?;

        let team = self.team_mut(player.team)?;
        team.withdraw(price)?;
        if let Some(holder) = team.player_mut(player.slot) {
            holder.add_pressure_tools(&prototype, quantity)?;
        }
        Ok(price)
    }

    /// Re-projects tile display colors from current ownership.
    pub fn refresh_colors(&mut self) {
        let teams = &self.teams;
        self.grid
            .set_all_team_color(|id| teams.get(id.index()).map(Team::color));
    }

    pub fn ownership_summary(&self) -> OwnershipSummary {
        self.grid.ownership_summary()
    }

    pub(crate) fn grid_mut(&mut self) -> &mut GridModel {
        &mut self.grid
    }

    pub(crate) fn restore_turn(&mut self, state: TurnState) -> Result<(), GameError> {
        self.turn.restore(state)
    }
}

fn unknown_team(id: TeamId) -> GameError {
    GameError::InvalidArgumentValue(format!("unknown team index {}", id))
}

fn unknown_player(r: PlayerRef) -> GameError {
    GameError::InvalidArgumentValue(format!("no player in slot {} of team {}", r.slot, r.team))
}
