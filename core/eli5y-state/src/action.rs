use eli5y_protocol::{Formula, FormulaId, GroupIndex, TokenIndex, ViewMode};

/// Every way the presentation state can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new formula came back from the service: it goes to the front of
    /// history and becomes current.
    Captured(Formula),
    /// Reopen a formula from history.
    Open(FormulaId),
    SetMode(ViewMode),
    SelectToken(TokenIndex),
    SelectGroup(GroupIndex),
    ClearSelection,
    ClearHistory,
}
