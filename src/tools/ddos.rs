//! Distributed attack: costly, breaks a fresh tile in one use.

use crate::grid::GridTile;
use crate::team::{Money, TeamId};

use super::{PressureTool, Reply};

pub const DDOS_COST: Money = 25;
pub const DDOS_STRENGTH: u8 = 3;

/// Lowers an enemy or unconquered tile's resistance by three points per
/// use, enough to capture a full-resistance tile at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DDos;

impl PressureTool for DDos {
    fn name(&self) -> &str {
        "ddos"
    }

    fn cost(&self) -> Money {
        DDOS_COST
    }

    fn charges(&self) -> u32 {
        1
    }

    fn apply(&mut self, target: &mut GridTile, attacker: TeamId) -> Reply {
        if target.is_owned_by(attacker) {
            return Reply::Bool(false);
        }
        target.apply_pressure(attacker, DDOS_STRENGTH);
        Reply::Bool(true)
    }
}
