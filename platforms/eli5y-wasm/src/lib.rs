use wasm_bindgen::prelude::*;
use serde::Serialize;

use eli5y_highlight::{group_at, token_at, Highlighter, RenderConfig, RenderedView};
use eli5y_ingest::IngestError;
use eli5y_protocol::{decode_snapshot, encode_snapshot, FormulaId, GroupIndex, TokenIndex, ViewMode};
use eli5y_state::{Action, AppState, StateConfig};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// History entry as listed to JavaScript.
#[derive(Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub latex: String,
    pub created_at: String,
    pub current: bool,
}

/// The presentation state plus the render pipeline, living in the browser.
///
/// JavaScript dispatches user intents through the methods below and calls
/// `render()` on every frame; the engine itself keeps no state.
#[wasm_bindgen]
pub struct Eli5yApp {
    state: AppState,
    highlighter: Highlighter,
}

#[wasm_bindgen]
impl Eli5yApp {
    #[wasm_bindgen(constructor)]
    pub fn new(history_cap: Option<usize>, target_width: Option<f32>) -> Result<Eli5yApp, JsError> {
        let mut render = RenderConfig::default();
        if let Some(width) = target_width {
            render.target_width = width;
        }
        render.validate()?;

        Ok(Self {
            state: AppState::new(StateConfig { history_cap }),
            highlighter: Highlighter::new(render),
        })
    }

    /// Validates a parse payload from the service and makes it current.
    /// Returns the new formula's id.
    pub fn capture(&mut self, payload_json: &str) -> Result<String, JsError> {
        Ok(self.capture_json(payload_json)?.0)
    }

    /// Restores a formula from a snapshot made by `snapshot()`.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<String, JsError> {
        let formula = decode_snapshot(bytes)?;
        let id = formula.id.clone();
        self.state.apply(Action::Captured(formula));
        Ok(id.0)
    }

    /// Snapshot of the current formula, if any.
    pub fn snapshot(&self) -> Result<Option<Vec<u8>>, JsError> {
        match self.state.current() {
            Some(formula) => Ok(Some(encode_snapshot(formula)?.to_vec())),
            None => Ok(None),
        }
    }

    pub fn open(&mut self, id: &str) {
        self.state.apply(Action::Open(FormulaId::new(id)));
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsError> {
        let mode: ViewMode = mode.parse()?;
        self.state.apply(Action::SetMode(mode));
        Ok(())
    }

    /// Selects token `index` in micro mode, group `index` otherwise.
    pub fn select(&mut self, index: u32) {
        self.state.apply(self.select_action(index));
    }

    /// Selects whatever region sits under a char offset of the expression.
    /// Returns false (and clears the selection) when there is none.
    pub fn select_at(&mut self, offset: usize) -> bool {
        let hit = self.state.current().and_then(|formula| match self.state.mode() {
            ViewMode::Micro => token_at(formula, offset).map(Action::SelectToken),
            ViewMode::Macro | ViewMode::Custom => {
                group_at(formula, offset).map(Action::SelectGroup)
            }
        });

        match hit {
            Some(action) => {
                self.state.apply(action);
                true
            }
            None => {
                self.state.apply(Action::ClearSelection);
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.apply(Action::ClearSelection);
    }

    pub fn clear_history(&mut self) {
        self.state.apply(Action::ClearHistory);
    }

    /// The current frame, or `undefined` with nothing open.
    pub fn render(&self) -> Result<JsValue, JsError> {
        match self.rendered() {
            Some(view) => Ok(serde_wasm_bindgen::to_value(&view)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Just the annotated expression of the current frame.
    pub fn render_markup(&self) -> Option<String> {
        self.rendered().map(|view| view.markup)
    }

    pub fn history(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.history_entries())?)
    }
}

impl Eli5yApp {
    fn capture_json(&mut self, payload_json: &str) -> Result<FormulaId, IngestError> {
        let formula = eli5y_ingest::from_json(payload_json)?;
        let id = formula.id.clone();
        self.state.apply(Action::Captured(formula));
        Ok(id)
    }

    fn select_action(&self, index: u32) -> Action {
        match self.state.mode() {
            ViewMode::Micro => Action::SelectToken(TokenIndex(index)),
            ViewMode::Macro | ViewMode::Custom => Action::SelectGroup(GroupIndex(index)),
        }
    }

    fn rendered(&self) -> Option<RenderedView> {
        self.state
            .view()
            .map(|view| self.highlighter.render(view.formula, view.mode, view.selection))
    }

    fn history_entries(&self) -> Vec<HistoryEntry> {
        let current = self.state.current().map(|f| &f.id);
        self.state
            .history()
            .map(|f| HistoryEntry {
                id: f.id.0.clone(),
                latex: f.latex.clone(),
                created_at: f.created_at.clone(),
                current: Some(&f.id) == current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eli5y_protocol::Selection;

    const PAYLOAD: &str = r#"{
        "latex": "a+b",
        "explanation": "add a to b",
        "components": [
            {"symbol": "a", "counterpart": "a to", "role": "left"},
            {"symbol": "b", "counterpart": "b", "role": "right"}
        ],
        "tokens": [{"index": [2, 3], "symbol": "b", "role": "variable", "color_id": "var_green"}]
    }"#;

    fn app() -> Eli5yApp {
        let mut app = Eli5yApp::new(Some(3), None).ok().unwrap();
        app.capture_json(PAYLOAD).unwrap();
        app
    }

    #[test]
    fn test_capture_and_render() {
        let app = app();
        let markup = app.render_markup().unwrap();
        assert!(markup.starts_with(r"\textcolor{#3B82F6}{a}"));
        assert_eq!(app.history_entries().len(), 1);
        assert!(app.history_entries()[0].current);
    }

    #[test]
    fn test_select_follows_mode() {
        let mut app = app();
        app.select(1);
        assert_eq!(app.state.selection(), Selection::Group(GroupIndex(1)));
        assert!(app.render_markup().unwrap().contains(r"\underline{"));

        app.state.apply(Action::SetMode(ViewMode::Micro));
        app.select(0);
        assert_eq!(app.state.selection(), Selection::Token(TokenIndex(0)));
    }

    #[test]
    fn test_select_at_offset() {
        let mut app = app();
        assert!(app.select_at(2));
        assert_eq!(app.state.selection(), Selection::Group(GroupIndex(1)));
        assert!(!app.select_at(1));
        assert_eq!(app.state.selection(), Selection::None);
    }

    #[test]
    fn test_history_cap_applies() {
        let mut app = app();
        for _ in 0..5 {
            app.capture_json(PAYLOAD).unwrap();
        }
        assert_eq!(app.history_entries().len(), 3);
    }

    #[test]
    fn test_restore_same_snapshot_twice() {
        let mut app = app();
        let bytes = encode_snapshot(app.state.current().unwrap()).unwrap().to_vec();
        let first = app.restore(&bytes).ok().unwrap();
        let second = app.restore(&bytes).ok().unwrap();

        assert_eq!(first, second);
        let entries = app.history_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.iter().filter(|e| e.current).count(), 1);
    }

    #[test]
    fn test_nothing_open() {
        let app = Eli5yApp::new(None, None).ok().unwrap();
        assert!(app.render_markup().is_none());
    }
}
