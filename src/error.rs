//! Error kinds raised by the game core.
//!
//! Every variant is a programming or configuration error: callers are
//! expected to avoid them, not to recover from them. A tool that simply
//! cannot be used right now is reported as `Ok(false)`, never as an error.

use thiserror::Error;

/// Errors produced by the game core and its session boundary.
#[derive(Debug, Error)]
pub enum GameError {
    /// An argument is of the wrong kind (e.g. a team operand where a tile is required).
    #[error("invalid argument type: expected {expected}, got {got}")]
    InvalidArgumentType { expected: &'static str, got: String },

    /// An argument has the right kind but lies outside the accepted domain.
    #[error("invalid argument value: {0}")]
    InvalidArgumentValue(String),

    /// A tool variant did not supply a required capability.
    #[error("not implemented: tool '{tool}' does not provide {capability}")]
    NotImplemented { tool: String, capability: &'static str },

    /// A tool policy answered with something other than a boolean.
    #[error("invalid return from tool '{tool}': expected a boolean, got {got}")]
    InvalidReturn { tool: String, got: String },

    /// Grid coordinate outside the grid bounds.
    #[error("coordinate ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// The operation would break a standing invariant (money bounds and similar).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// An entity is already registered.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    /// A session document could not be decoded.
    #[error("malformed session document: {0}")]
    Session(#[from] serde_json::Error),

    /// A session document could not be read.
    #[error("failed to read session document: {0}")]
    Io(#[from] std::io::Error),
}
