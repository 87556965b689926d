//! Registry of tool variants available in a session.

use std::collections::BTreeMap;

use crate::error::GameError;

use super::{DDos, Dos, ScriptedTool, ScriptedToolDef, Tool, ToolKind};

/// Native variants plus the scripted variants declared for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    scripted: BTreeMap<String, ScriptedTool>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a scripted variant.
    pub fn register(&mut self, def: &ScriptedToolDef) -> Result<(), GameError> {
        let tool = ScriptedTool::from_def(def)?;
        if !matches!(ToolKind::from_name(&def.name), ToolKind::Scripted(_))
            || self.scripted.contains_key(&def.name)
        {
            return Err(GameError::DuplicateEntity(format!("tool '{}'", def.name)));
        }
        self.scripted.insert(def.name.clone(), tool);
        Ok(())
    }

    /// Returns a fresh instance of the variant named by `kind`.
    pub fn prototype(&self, kind: &ToolKind) -> Result<Tool, GameError> {
        match kind {
            ToolKind::Dos => Ok(Tool::Dos(Dos)),
            ToolKind::DDos => Ok(Tool::DDos(DDos)),
            ToolKind::Scripted(name) => self
                .scripted
                .get(name)
                .cloned()
                .map(Tool::Scripted)
                .ok_or_else(|| GameError::InvalidArgumentValue(format!("unknown tool '{}'", name))),
        }
    }

    /// Definitions of every registered scripted variant, ordered by name.
    pub fn scripted_defs(&self) -> Vec<ScriptedToolDef> {
        self.scripted.values().map(ScriptedTool::to_def).collect()
    }

    /// All variant kinds known to the catalog.
    pub fn kinds(&self) -> Vec<ToolKind> {
        let mut kinds = vec![ToolKind::Dos, ToolKind::DDos];
        kinds.extend(self.scripted.keys().cloned().map(ToolKind::Scripted));
        kinds
    }
}
