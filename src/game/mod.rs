//! Game aggregate and turn progression.
//!
//! `GameModel` is the single owner of all session state. Turns rotate on a
//! wall-clock period sampled by an external driver through a `TimeSource`.

pub mod clock;
pub mod model;
pub mod turn;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use model::{GameConfig, GameModel, PlayerRef};
pub use turn::{TurnChange, TurnObserver, TurnScheduler, TurnState, MAX_TURN_PERIOD};
