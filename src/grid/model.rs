//! The fixed-size tile grid.
//!
//! Tiles are stored row-major in a single allocation made at construction.
//! The dimensions never change for the lifetime of a session.

use std::collections::BTreeMap;

use crate::error::GameError;
use crate::team::{Color, TeamId};

use super::tile::{Coord, GridTile};

/// Largest number of tiles a grid may hold.
pub const MAX_GRID_TILES: usize = 1 << 16;

/// Tile counts per owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipSummary {
    pub per_team: BTreeMap<TeamId, usize>,
    pub unowned: usize,
}

impl OwnershipSummary {
    /// Tiles held by `team`.
    pub fn tiles_of(&self, team: TeamId) -> usize {
        self.per_team.get(&team).copied().unwrap_or(0)
    }
}

/// The grid of a session. Owns every tile exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    width: usize,
    height: usize,
    tiles: Vec<GridTile>,
}

impl GridModel {
    /// Allocates a `width` x `height` grid of unconquered tiles.
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidArgumentValue(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let area = width
            .checked_mul(height)
            .filter(|&area| area <= MAX_GRID_TILES)
            .ok_or_else(|| {
                GameError::InvalidArgumentValue(format!(
                    "grid {}x{} exceeds {} tiles",
                    width, height, MAX_GRID_TILES
                ))
            })?;
        let mut tiles = Vec::with_capacity(area);
        for row in 0..height {
            for col in 0..width {
                tiles.push(GridTile::new(Coord::new(row, col)));
            }
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    fn index(&self, coord: Coord) -> Result<usize, GameError> {
        if !self.contains(coord) {
            return Err(GameError::OutOfRange {
                row: coord.row,
                col: coord.col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(coord.row * self.width + coord.col)
    }

    /// Looks up a tile. Coordinates outside the grid are an error.
    pub fn tile(&self, coord: Coord) -> Result<&GridTile, GameError> {
        let idx = self.index(coord)?;
        Ok(&self.tiles[idx])
    }

    pub fn tile_mut(&mut self, coord: Coord) -> Result<&mut GridTile, GameError> {
        let idx = self.index(coord)?;
        Ok(&mut self.tiles[idx])
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &GridTile> {
        self.tiles.iter()
    }

    /// One row of tiles, left to right.
    pub fn row(&self, row: usize) -> Option<&[GridTile]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.tiles[start..start + self.width])
    }

    /// Projects every tile's display color from its owner's team color.
    ///
    /// Ownership is left untouched; unconquered tiles get no color.
    pub fn set_all_team_color<F>(&mut self, color_of: F)
    where
        F: Fn(TeamId) -> Option<Color>,
    {
        for tile in &mut self.tiles {
            let color = tile.owner().and_then(&color_of);
            tile.set_color(color);
        }
    }

    /// Counts tiles per owning team.
    pub fn ownership_summary(&self) -> OwnershipSummary {
        let mut summary = OwnershipSummary::default();
        for tile in &self.tiles {
            match tile.owner() {
                Some(team) => *summary.per_team.entry(team).or_insert(0) += 1,
                None => summary.unowned += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_allocates_every_tile() {
        let grid = GridModel::new(4, 3).unwrap();
        assert_eq!(grid.tiles().count(), 12);
        assert_eq!(grid.ownership_summary().unowned, 12);
        for tile in grid.tiles() {
            assert!(grid.contains(tile.coord()));
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            GridModel::new(0, 5),
            Err(GameError::InvalidArgumentValue(_))
        ));
        assert!(matches!(
            GridModel::new(5, 0),
            Err(GameError::InvalidArgumentValue(_))
        ));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        assert!(matches!(
            GridModel::new(usize::MAX, 2),
            Err(GameError::InvalidArgumentValue(_))
        ));
        assert!(matches!(
            GridModel::new(MAX_GRID_TILES + 1, 1),
            Err(GameError::InvalidArgumentValue(_))
        ));
        let edge = GridModel::new(MAX_GRID_TILES, 1).unwrap();
        assert_eq!(edge.tiles().count(), MAX_GRID_TILES);
    }

    #[test]
    fn lookup_returns_matching_coordinate() {
        let grid = GridModel::new(6, 4).unwrap();
        let tile = grid.tile(Coord::new(3, 5)).unwrap();
        assert_eq!(tile.coord(), Coord::new(3, 5));
    }

    #[test]
    fn lookup_outside_bounds_fails() {
        let mut grid = GridModel::new(6, 4).unwrap();
        assert!(matches!(
            grid.tile(Coord::new(4, 0)),
            Err(GameError::OutOfRange { row: 4, col: 0, .. })
        ));
        assert!(matches!(
            grid.tile_mut(Coord::new(0, 6)),
            Err(GameError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rows_are_row_major() {
        let grid = GridModel::new(3, 2).unwrap();
        let row = grid.row(1).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row[2].coord(), Coord::new(1, 2));
        assert!(grid.row(2).is_none());
    }

    #[test]
    fn team_color_projection_follows_owner() {
        let mut grid = GridModel::new(2, 2).unwrap();
        grid.tile_mut(Coord::new(0, 0)).unwrap().conquer(TeamId(0));
        grid.tile_mut(Coord::new(1, 1)).unwrap().conquer(TeamId(1));

        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        grid.set_all_team_color(|team| match team {
            TeamId(0) => Some(red),
            TeamId(1) => Some(blue),
            _ => None,
        });

        assert_eq!(grid.tile(Coord::new(0, 0)).unwrap().color(), Some(red));
        assert_eq!(grid.tile(Coord::new(1, 1)).unwrap().color(), Some(blue));
        assert_eq!(grid.tile(Coord::new(0, 1)).unwrap().color(), None);
        assert_eq!(
            grid.tile(Coord::new(1, 1)).unwrap().owner(),
            Some(TeamId(1))
        );
    }

    #[test]
    fn ownership_summary_counts_per_team() {
        let mut grid = GridModel::new(3, 3).unwrap();
        grid.tile_mut(Coord::new(0, 0)).unwrap().conquer(TeamId(0));
        grid.tile_mut(Coord::new(0, 1)).unwrap().conquer(TeamId(0));
        grid.tile_mut(Coord::new(2, 2)).unwrap().conquer(TeamId(2));

        let summary = grid.ownership_summary();
        assert_eq!(summary.tiles_of(TeamId(0)), 2);
        assert_eq!(summary.tiles_of(TeamId(1)), 0);
        assert_eq!(summary.tiles_of(TeamId(2)), 1);
        assert_eq!(summary.unowned, 6);
    }
}
