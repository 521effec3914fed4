use serde::Deserialize;

/// Presentation-state knobs. Deserialized from the `[state]` table of the
/// tool config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfig {
    /// Most formulas kept in history. `None` never evicts.
    pub history_cap: Option<usize>,
}

impl StateConfig {
    pub fn with_history_cap(cap: usize) -> Self {
        Self {
            history_cap: Some(cap),
        }
    }
}
