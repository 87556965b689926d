//! A single cell of ownership state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::team::{Color, TeamId};

/// Resistance a tile starts with, and returns to after changing hands.
pub const BASE_RESISTANCE: u8 = 3;

/// A grid position. Rows run along the height, columns along the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One tile of the grid.
///
/// The position is fixed at creation. Ownership is all-or-nothing: a tile is
/// either unconquered or held by exactly one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile {
    coord: Coord,
    owner: Option<TeamId>,
    resistance: u8,
    /// Display color projected from the owner; see `GridModel::set_all_team_color`.
    color: Option<Color>,
}

impl GridTile {
    /// Creates an unconquered tile at full resistance.
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            owner: None,
            resistance: BASE_RESISTANCE,
            color: None,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// The owning team, or `None` while unconquered.
    pub fn owner(&self) -> Option<TeamId> {
        self.owner
    }

    pub fn is_owned_by(&self, team: TeamId) -> bool {
        self.owner == Some(team)
    }

    /// Remaining pressure the tile absorbs before it changes hands.
    pub fn resistance(&self) -> u8 {
        self.resistance
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Assigns the tile to `team`, replacing any previous owner.
    ///
    /// Conquering a tile the team already holds changes nothing. A change of
    /// hands restores full resistance.
    pub fn conquer(&mut self, team: TeamId) {
        if self.owner == Some(team) {
            return;
        }
        self.owner = Some(team);
        self.resistance = BASE_RESISTANCE;
    }

    /// Applies `strength` points of pressure on behalf of `attacker`.
    ///
    /// Returns true if the pressure broke the tile and it was conquered.
    /// Only tool policies call this.
    pub(crate) fn apply_pressure(&mut self, attacker: TeamId, strength: u8) -> bool {
        self.resistance = self.resistance.saturating_sub(strength);
        if self.resistance == 0 {
            self.owner = Some(attacker);
            self.resistance = BASE_RESISTANCE;
            return true;
        }
        false
    }

    pub(crate) fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Overwrites the full ownership state. Used when restoring a snapshot.
    pub(crate) fn restore(&mut self, owner: Option<TeamId>, resistance: u8) {
        self.owner = owner;
        self.resistance = resistance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tile_is_unconquered() {
        let tile = GridTile::new(Coord::new(2, 3));
        assert_eq!(tile.coord(), Coord::new(2, 3));
        assert_eq!(tile.owner(), None);
        assert_eq!(tile.resistance(), BASE_RESISTANCE);
        assert_eq!(tile.color(), None);
    }

    #[test]
    fn conquer_same_team_is_idempotent() {
        let mut tile = GridTile::new(Coord::new(0, 0));
        tile.conquer(TeamId(1));
        tile.apply_pressure(TeamId(2), 1);
        let before = tile.clone();
        tile.conquer(TeamId(1));
        assert_eq!(tile, before);
        assert_eq!(tile.owner(), Some(TeamId(1)));
    }

    #[test]
    fn conquer_overwrites_different_owner() {
        let mut tile = GridTile::new(Coord::new(0, 0));
        tile.conquer(TeamId(0));
        tile.apply_pressure(TeamId(1), 2);
        tile.conquer(TeamId(1));
        assert_eq!(tile.owner(), Some(TeamId(1)));
        assert_eq!(tile.resistance(), BASE_RESISTANCE);
    }

    #[test]
    fn pressure_below_resistance_only_weakens() {
        let mut tile = GridTile::new(Coord::new(1, 1));
        assert!(!tile.apply_pressure(TeamId(0), 1));
        assert_eq!(tile.owner(), None);
        assert_eq!(tile.resistance(), BASE_RESISTANCE - 1);
    }

    #[test]
    fn pressure_breaking_resistance_captures() {
        let mut tile = GridTile::new(Coord::new(1, 1));
        tile.conquer(TeamId(2));
        assert!(tile.apply_pressure(TeamId(0), BASE_RESISTANCE + 4));
        assert_eq!(tile.owner(), Some(TeamId(0)));
        assert_eq!(tile.resistance(), BASE_RESISTANCE);
    }
}
