//! Pressure tools: depletable, costed actions applied to tiles.
//!
//! A variant implements `PressureTool`, which decides whether an attempt
//! against a tile succeeds and what it does to the tile. `PressureToolSet`
//! wraps a variant with its remaining use count and enforces the use
//! contract around it.

pub mod catalog;
pub mod ddos;
pub mod dos;
pub mod scripted;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::grid::GridTile;
use crate::team::{Money, TeamId};

pub use catalog::ToolCatalog;
pub use ddos::DDos;
pub use dos::Dos;
pub use scripted::{ScriptedTool, ScriptedToolDef};

/// What a policy answers after an attempt.
///
/// Policies may be defined by data, so the answer is loosely typed; only a
/// JSON boolean is a valid answer.
pub type Reply = serde_json::Value;

/// A tool variant's application policy.
pub trait PressureTool {
    /// Display name of the variant.
    fn name(&self) -> &str;

    /// Price of one instance, for economy accounting by callers.
    fn cost(&self) -> Money;

    /// Uses granted to a freshly created instance.
    fn charges(&self) -> u32;

    /// Attempts the tool against `target` on behalf of `attacker`.
    ///
    /// Must answer `true` when the attempt took effect and `false` when the
    /// target is not a valid victim. The tile may only be mutated on `true`.
    fn apply(&mut self, target: &mut GridTile, attacker: TeamId) -> Reply;
}

/// Identity of a tool variant, used as the inventory key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Dos,
    DDos,
    Scripted(String),
}

impl ToolKind {
    /// Parses a protocol name. Anything other than the native names refers
    /// to a scripted variant.
    pub fn from_name(name: &str) -> ToolKind {
        match name {
            "dos" => ToolKind::Dos,
            "ddos" => ToolKind::DDos,
            other => ToolKind::Scripted(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ToolKind::Dos => "dos",
            ToolKind::DDos => "ddos",
            ToolKind::Scripted(name) => name,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every variant a player can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Dos(Dos),
    DDos(DDos),
    Scripted(ScriptedTool),
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Dos(_) => ToolKind::Dos,
            Tool::DDos(_) => ToolKind::DDos,
            Tool::Scripted(t) => ToolKind::Scripted(t.name().to_string()),
        }
    }
}

impl PressureTool for Tool {
    fn name(&self) -> &str {
        match self {
            Tool::Dos(t) => t.name(),
            Tool::DDos(t) => t.name(),
            Tool::Scripted(t) => t.name(),
        }
    }

    fn cost(&self) -> Money {
        match self {
            Tool::Dos(t) => t.cost(),
            Tool::DDos(t) => t.cost(),
            Tool::Scripted(t) => t.cost(),
        }
    }

    fn charges(&self) -> u32 {
        match self {
            Tool::Dos(t) => t.charges(),
            Tool::DDos(t) => t.charges(),
            Tool::Scripted(t) => t.charges(),
        }
    }

    fn apply(&mut self, target: &mut GridTile, attacker: TeamId) -> Reply {
        match self {
            Tool::Dos(t) => t.apply(target, attacker),
            Tool::DDos(t) => t.apply(target, attacker),
            Tool::Scripted(t) => t.apply(target, attacker),
        }
    }
}

/// One held instance of a tool variant and its remaining uses.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureToolSet<P> {
    tool: P,
    count: u32,
    owner: TeamId,
}

impl<P: PressureTool> PressureToolSet<P> {
    /// Wraps `tool` with `count` uses, acting for team `owner`.
    pub fn new(tool: P, count: u32, owner: TeamId) -> Self {
        Self { tool, count, owner }
    }

    /// Remaining uses.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cost(&self) -> Money {
        self.tool.cost()
    }

    pub fn owner(&self) -> TeamId {
        self.owner
    }

    pub fn tool(&self) -> &P {
        &self.tool
    }

    pub fn is_depleted(&self) -> bool {
        self.count == 0
    }

    /// Attempts one use against `target`.
    ///
    /// Returns `Ok(false)` when depleted or when the policy declines the
    /// target; the count is unchanged in both cases. Each `Ok(true)` costs
    /// exactly one use. A policy answering anything but a boolean is an error.
    pub fn try_use(&mut self, target: &mut GridTile) -> Result<bool, GameError> {
        if self.count == 0 {
            return Ok(false);
        }
        let reply = self.tool.apply(target, self.owner);
        let ok = reply.as_bool().ok_or_else(|| GameError::InvalidReturn {
            tool: self.tool.name().to_string(),
            got: reply.to_string(),
        })?;
        if ok {
            self.count -= 1;
        }
        Ok(ok)
    }
}
