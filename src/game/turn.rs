//! Wall-clock turn rotation.
//!
//! The only state is whose turn it is and when that turn began. The
//! transition is a pure function of that state and a sampled time, so it
//! can be driven by a local clock or by externally delivered events alike.

use std::time::Duration;

use crate::error::GameError;

/// Longest accepted turn period.
pub const MAX_TURN_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Position in the rotation and the start time of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    pub active: usize,
    pub started_at: Duration,
    /// Time the turn had already run before `started_at`. Only a resumed
    /// turn carries any.
    pub carried: Duration,
    /// Number of rotations since the session began.
    pub turn_number: u64,
}

impl TurnState {
    /// Hands the turn to the next player in a rotation of `len` players.
    pub fn next(self, len: usize, now: Duration) -> TurnState {
        TurnState {
            active: (self.active + 1) % len,
            started_at: now,
            carried: Duration::ZERO,
            turn_number: self.turn_number + 1,
        }
    }
}

/// Emitted once per rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnChange {
    pub previous: usize,
    pub active: usize,
    pub at: Duration,
    pub turn_number: u64,
}

/// Hook for the presentation side: called after every rotation so it can
/// refresh turn-dependent displays such as the available tools.
pub trait TurnObserver {
    fn turn_changed(&mut self, change: &TurnChange);
}

impl<F: FnMut(&TurnChange)> TurnObserver for F {
    fn turn_changed(&mut self, change: &TurnChange) {
        self(change)
    }
}

/// Round-robin scheduler over a fixed rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnScheduler {
    period: Duration,
    len: usize,
    state: TurnState,
}

impl TurnScheduler {
    /// Starts the first player's turn at `now`.
    pub fn new(period: Duration, len: usize, now: Duration) -> Result<Self, GameError> {
        if period.is_zero() {
            return Err(GameError::InvalidArgumentValue(
                "turn period must be positive".to_string(),
            ));
        }
        if period > MAX_TURN_PERIOD {
            return Err(GameError::InvalidArgumentValue(format!(
                "turn period {:?} exceeds {:?}",
                period, MAX_TURN_PERIOD
            )));
        }
        if len == 0 {
            return Err(GameError::InvalidArgumentValue(
                "turn rotation needs at least one player".to_string(),
            ));
        }
        Ok(Self {
            period,
            len,
            state: TurnState {
                active: 0,
                started_at: now,
                carried: Duration::ZERO,
                turn_number: 0,
            },
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn active(&self) -> usize {
        self.state.active
    }

    /// Time spent in the current turn. A clock reading before the turn
    /// start adds nothing to the carried time.
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.state
            .carried
            .saturating_add(now.saturating_sub(self.state.started_at))
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.period.saturating_sub(self.elapsed(now))
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.period
    }

    /// Rotates if the period has elapsed. At most one rotation per call,
    /// however late the call is.
    pub fn poll(&mut self, now: Duration) -> Option<TurnChange> {
        if self.is_due(now) {
            Some(self.advance(now))
        } else {
            None
        }
    }

    /// Rotates unconditionally and restarts the turn timer at `now`.
    pub fn advance(&mut self, now: Duration) -> TurnChange {
        let previous = self.state.active;
        self.state = self.state.next(self.len, now);
        TurnChange {
            previous,
            active: self.state.active,
            at: now,
            turn_number: self.state.turn_number,
        }
    }

    /// Replaces the state wholesale. Used when restoring a snapshot.
    pub(crate) fn restore(&mut self, state: TurnState) -> Result<(), GameError> {
        if state.active >= self.len {
            return Err(GameError::InvalidArgumentValue(format!(
                "active player index {} outside rotation of {}",
                state.active, self.len
            )));
        }
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn rejects_zero_period_and_empty_rotation() {
        assert!(TurnScheduler::new(Duration::ZERO, 3, secs(0)).is_err());
        assert!(TurnScheduler::new(secs(30), 0, secs(0)).is_err());
    }

    #[test]
    fn no_rotation_before_period() {
        let mut s = TurnScheduler::new(secs(30), 3, secs(0)).unwrap();
        assert_eq!(s.poll(secs(29)), None);
        assert_eq!(s.active(), 0);
        assert_eq!(s.remaining(secs(29)), secs(1));
    }

    #[test]
    fn rotation_at_period_resets_timer() {
        let mut s = TurnScheduler::new(secs(30), 3, secs(0)).unwrap();
        let change = s.poll(secs(30)).unwrap();
        assert_eq!(change.previous, 0);
        assert_eq!(change.active, 1);
        assert_eq!(change.turn_number, 1);
        assert_eq!(s.state().started_at, secs(30));
        assert_eq!(s.poll(secs(59)), None);
    }

    #[test]
    fn late_poll_rotates_once() {
        let mut s = TurnScheduler::new(secs(30), 3, secs(0)).unwrap();
        s.poll(secs(95)).unwrap();
        assert_eq!(s.active(), 1);
        assert_eq!(s.poll(secs(96)), None);
    }

    #[test]
    fn full_cycle_visits_every_player_once() {
        let n = 6;
        let mut s = TurnScheduler::new(secs(30), n, secs(0)).unwrap();
        let mut seen = vec![s.active()];
        for i in 1..=n as u64 {
            s.advance(secs(30 * i));
            seen.push(s.active());
        }
        assert_eq!(seen.first(), seen.last());
        let mut visited = seen[..n].to_vec();
        visited.sort_unstable();
        assert_eq!(visited, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn clock_before_turn_start_is_not_due() {
        let s = TurnScheduler::new(secs(30), 2, secs(100)).unwrap();
        assert!(!s.is_due(secs(10)));
        assert_eq!(s.elapsed(secs(10)), Duration::ZERO);
    }

    #[test]
    fn restore_rejects_index_outside_rotation() {
        let mut s = TurnScheduler::new(secs(30), 2, secs(0)).unwrap();
        let bad = TurnState {
            active: 2,
            started_at: secs(0),
            carried: Duration::ZERO,
            turn_number: 0,
        };
        assert!(s.restore(bad).is_err());
        assert_eq!(s.active(), 0);
    }

    #[test]
    fn resumed_turn_keeps_its_phase() {
        let mut s = TurnScheduler::new(secs(30), 3, secs(0)).unwrap();
        s.restore(TurnState {
            active: 1,
            started_at: secs(5),
            carried: secs(20),
            turn_number: 4,
        })
        .unwrap();
        assert_eq!(s.remaining(secs(5)), secs(10));
        assert_eq!(s.poll(secs(14)), None);
        let change = s.poll(secs(15)).unwrap();
        assert_eq!(change.active, 2);
        assert_eq!(s.state().carried, Duration::ZERO);
        assert_eq!(s.remaining(secs(15)), secs(30));
    }

    #[test]
    fn rejects_period_beyond_limit() {
        assert!(TurnScheduler::new(MAX_TURN_PERIOD, 2, secs(0)).is_ok());
        assert!(TurnScheduler::new(MAX_TURN_PERIOD + secs(1), 2, secs(0)).is_err());
    }

    #[test]
    fn far_future_poll_does_not_overflow() {
        let mut s = TurnScheduler::new(secs(30), 2, secs(0)).unwrap();
        s.restore(TurnState {
            active: 0,
            started_at: secs(0),
            carried: Duration::MAX,
            turn_number: 0,
        })
        .unwrap();
        assert!(s.poll(Duration::MAX).is_some());
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |c: &TurnChange| seen.push(c.active);
            let change = TurnChange {
                previous: 0,
                active: 1,
                at: secs(30),
                turn_number: 1,
            };
            observer.turn_changed(&change);
        }
        assert_eq!(seen, vec![1]);
    }
}
