//! Session bootstrap and persistence.
//!
//! Session composition (teams, players, starting inventories, grid size,
//! timing) is decided here, outside the game core, and handed to
//! `GameModel` already validated.

pub mod config;
pub mod snapshot;

pub use config::{demo_session, GridConfig, PlayerConfig, SeedConfig, SessionConfig, TeamConfig};
pub use snapshot::{PlayerSnapshot, SessionSnapshot, TeamSnapshot, TileSnapshot, ToolStack};
