//! Grid representation.
//!
//! Contains the tile ownership model and the fixed-size grid that owns all
//! tiles of a session.

pub mod model;
pub mod tile;

pub use model::{GridModel, OwnershipSummary, MAX_GRID_TILES};
pub use tile::{Coord, GridTile, BASE_RESISTANCE};
