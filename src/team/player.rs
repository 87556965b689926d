//! Players and their tool inventories.

use std::collections::BTreeMap;

use crate::error::GameError;
use crate::tools::{PressureTool, PressureToolSet, Tool, ToolKind};

use super::team::TeamId;

/// Most instances of a single variant one player may hold.
pub const MAX_TOOL_INSTANCES: usize = 1024;

/// A participant. Belongs to one team for its whole lifetime; the team is
/// recorded by id, the `Team` owns the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    team: TeamId,
    tools: BTreeMap<ToolKind, Vec<PressureToolSet<Tool>>>,
}

impl Player {
    pub fn new(name: impl Into<String>, team: TeamId) -> Self {
        Self {
            name: name.into(),
            team,
            tools: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    /// Adds `quantity` independent instances of `prototype`, each with the
    /// variant's full charges.
    ///
    /// Fails without adding anything if the player would hold more than
    /// `MAX_TOOL_INSTANCES` of the variant.
    pub fn add_pressure_tools(&mut self, prototype: &Tool, quantity: usize) -> Result<(), GameError> {
        self.check_room(&prototype.kind(), quantity)?;
        let charges = prototype.charges();
        self.add_tool_sets(prototype, std::iter::repeat(charges).take(quantity))
    }

    /// Adds one instance of `prototype` per entry of `counts`, with that many uses left.
    pub(crate) fn add_tool_sets<I>(&mut self, prototype: &Tool, counts: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = u32>,
    {
        let kind = prototype.kind();
        let room = self.room_for(&kind);
        let counts: Vec<u32> = counts.into_iter().take(room.saturating_add(1)).collect();
        self.check_room(&kind, counts.len())?;
        let slots = self.tools.entry(kind).or_default();
        for count in counts {
            slots.push(PressureToolSet::new(prototype.clone(), count, self.team));
        }
        Ok(())
    }

    /// How many more instances of `kind` the player can take.
    pub fn room_for(&self, kind: &ToolKind) -> usize {
        MAX_TOOL_INSTANCES.saturating_sub(self.tools(kind).len())
    }

    pub(crate) fn check_room(&self, kind: &ToolKind, quantity: usize) -> Result<(), GameError> {
        if quantity > self.room_for(kind) {
            return Err(GameError::InvalidArgumentValue(format!(
                "player '{}' cannot hold {} more {} (limit {})",
                self.name, quantity, kind, MAX_TOOL_INSTANCES
            )));
        }
        Ok(())
    }

    /// Instances of one variant, in the order they were added.
    pub fn tools(&self, kind: &ToolKind) -> &[PressureToolSet<Tool>] {
        self.tools.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tool_mut(&mut self, kind: &ToolKind, slot: usize) -> Option<&mut PressureToolSet<Tool>> {
        self.tools.get_mut(kind).and_then(|slots| slots.get_mut(slot))
    }

    /// Remaining uses across all instances of `kind`.
    pub fn remaining(&self, kind: &ToolKind) -> u32 {
        self.tools(kind).iter().map(PressureToolSet::count).sum()
    }

    /// Whole inventory, keyed by variant.
    pub fn inventory(&self) -> impl Iterator<Item = (&ToolKind, &[PressureToolSet<Tool>])> {
        self.tools.iter().map(|(kind, slots)| (kind, slots.as_slice()))
    }
}
