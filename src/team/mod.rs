//! Teams, players, and the money economy.

pub mod player;
pub mod team;

pub use player::{Player, MAX_TOOL_INSTANCES};
pub use team::{Color, Money, Team, TeamId};
