//! Data-defined tool variants.
//!
//! A scripted tool is declared in a session document. Its answer for each
//! kind of target is an arbitrary JSON value taken from the document, so a
//! badly written definition surfaces as an invalid return on first use.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::grid::GridTile;
use crate::team::{Money, TeamId};

use super::{PressureTool, Reply};

fn default_charges() -> u32 {
    1
}

fn default_strength() -> u8 {
    1
}

fn reply_true() -> Reply {
    Reply::Bool(true)
}

fn reply_false() -> Reply {
    Reply::Bool(false)
}

/// A scripted tool as written in a session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedToolDef {
    pub name: String,
    #[serde(default)]
    pub cost: Option<Money>,
    #[serde(default = "default_charges")]
    pub charges: u32,
    #[serde(default = "default_strength")]
    pub strength: u8,
    #[serde(default = "reply_true")]
    pub on_unowned: Reply,
    #[serde(default = "reply_true")]
    pub on_enemy: Reply,
    #[serde(default = "reply_false")]
    pub on_own: Reply,
}

/// A validated scripted tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedTool {
    name: String,
    cost: Money,
    charges: u32,
    strength: u8,
    on_unowned: Reply,
    on_enemy: Reply,
    on_own: Reply,
}

impl ScriptedTool {
    /// Validates a definition. A definition without a cost is incomplete.
    pub fn from_def(def: &ScriptedToolDef) -> Result<Self, GameError> {
        if def.name.trim().is_empty() {
            return Err(GameError::InvalidArgumentValue(
                "scripted tool name must not be empty".to_string(),
            ));
        }
        let cost = def.cost.ok_or_else(|| GameError::NotImplemented {
            tool: def.name.clone(),
            capability: "cost",
        })?;
        if def.strength == 0 {
            return Err(GameError::InvalidArgumentValue(format!(
                "scripted tool '{}' must have positive strength",
                def.name
            )));
        }
        Ok(Self {
            name: def.name.clone(),
            cost,
            charges: def.charges,
            strength: def.strength,
            on_unowned: def.on_unowned.clone(),
            on_enemy: def.on_enemy.clone(),
            on_own: def.on_own.clone(),
        })
    }

    /// Converts back into its document form.
    pub fn to_def(&self) -> ScriptedToolDef {
        ScriptedToolDef {
            name: self.name.clone(),
            cost: Some(self.cost),
            charges: self.charges,
            strength: self.strength,
            on_unowned: self.on_unowned.clone(),
            on_enemy: self.on_enemy.clone(),
            on_own: self.on_own.clone(),
        }
    }
}

impl PressureTool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> Money {
        self.cost
    }

    fn charges(&self) -> u32 {
        self.charges
    }

    fn apply(&mut self, target: &mut GridTile, attacker: TeamId) -> Reply {
        let reply = match target.owner() {
            None => &self.on_unowned,
            Some(owner) if owner == attacker => &self.on_own,
            Some(_) => &self.on_enemy,
        };
        if reply.as_bool() == Some(true) {
            target.apply_pressure(attacker, self.strength);
        }
        reply.clone()
    }
}
