pub mod action;
pub mod config;

use std::collections::VecDeque;

use eli5y_protocol::{Formula, FormulaId, Selection, ViewMode};
use tracing::debug;

pub use action::Action;
pub use config::StateConfig;

/// What the render pipeline needs from the state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View<'a> {
    pub formula: &'a Formula,
    pub mode: ViewMode,
    pub selection: Selection,
}

/// Presentation state, owned by the UI and changed only through [`Action`]s.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Most recent first.
    history: VecDeque<Formula>,
    current: Option<FormulaId>,
    selection: Selection,
    mode: ViewMode,
    config: StateConfig,
}

impl AppState {
    pub fn new(config: StateConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &Formula> {
        self.history.iter()
    }

    pub fn current(&self) -> Option<&Formula> {
        let id = self.current.as_ref()?;
        self.history.iter().find(|f| &f.id == id)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// The current formula with mode and selection, if a formula is open.
    pub fn view(&self) -> Option<View<'_>> {
        self.current().map(|formula| View {
            formula,
            mode: self.mode,
            selection: self.selection,
        })
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Captured(formula) => {
                // Recapturing an id moves it to the front
                if let Some(pos) = self.history.iter().position(|f| f.id == formula.id) {
                    debug!(id = %formula.id, "replacing formula already in history");
                    self.history.remove(pos);
                }
                self.current = Some(formula.id.clone());
                self.selection = Selection::None;
                self.history.push_front(formula);
                self.evict();
            }
            Action::Open(id) => {
                if self.history.iter().any(|f| f.id == id) {
                    self.current = Some(id);
                    self.selection = Selection::None;
                } else {
                    debug!(%id, "ignoring open of unknown formula");
                }
            }
            Action::SetMode(mode) => {
                if mode != self.mode {
                    self.mode = mode;
                    self.selection = Selection::None;
                }
            }
            Action::SelectToken(index) => {
                let exists = self.current().is_some_and(|f| f.token(index).is_some());
                self.select(Selection::Token(index), exists);
            }
            Action::SelectGroup(index) => {
                let exists = self.current().is_some_and(|f| f.group(index).is_some());
                self.select(Selection::Group(index), exists);
            }
            Action::ClearSelection => self.selection = Selection::None,
            Action::ClearHistory => {
                self.history.clear();
                self.current = None;
                self.selection = Selection::None;
            }
        }
    }

    fn select(&mut self, selection: Selection, exists: bool) {
        if exists {
            self.selection = selection;
        } else {
            debug!(?selection, "ignoring selection outside the current formula");
        }
    }

    fn evict(&mut self) {
        let Some(cap) = self.config.history_cap else {
            return;
        };

        while self.history.len() > cap {
            if let Some(evicted) = self.history.pop_back() {
                debug!(id = %evicted.id, "evicting formula from history");
            }
        }

        if self.current().is_none() {
            self.current = self.history.front().map(|f| f.id.clone());
            self.selection = Selection::None;
        }
    }
}

/// Applies `action` to `state` and returns the result.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    state.apply(action);
    state
}
