//! Pressurefront engine library.
//!
//! A turn-based grid conquest game: teams of players spend consumable
//! pressure tools to wear down and capture tiles while a wall-clock
//! scheduler rotates the active player. Exposes the game model, session
//! loading, the frame-driver protocol, and batch simulation for use by the
//! binaries and integration tests.

pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod protocol;
pub mod session;
pub mod simulate;
pub mod team;
pub mod tools;
