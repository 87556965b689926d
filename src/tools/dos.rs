//! Single-source attack: cheap and light.

use crate::grid::GridTile;
use crate::team::{Money, TeamId};

use super::{PressureTool, Reply};

pub const DOS_COST: Money = 10;
pub const DOS_STRENGTH: u8 = 1;

/// Lowers an enemy or unconquered tile's resistance by one point per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dos;

impl PressureTool for Dos {
    fn name(&self) -> &str {
        "dos"
    }

    fn cost(&self) -> Money {
        DOS_COST
    }

    fn charges(&self) -> u32 {
        1
    }

    fn apply(&mut self, target: &mut GridTile, attacker: TeamId) -> Reply {
        if target.is_owned_by(attacker) {
            return Reply::Bool(false);
        }
        target.apply_pressure(attacker, DOS_STRENGTH);
        Reply::Bool(true)
    }
}
