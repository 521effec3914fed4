use eli5y_protocol::{Span, TokenRole};
use serde::Deserialize;

/// The parse response as returned by the inference service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsePayload {
    pub latex: String,
    pub explanation: String,
    pub components: Vec<RawComponent>,
    #[serde(default)]
    pub tokens: Vec<RawToken>,
    #[serde(default, alias = "spark_chips")]
    pub suggestions: Vec<String>,
}

/// One semantic component: latex symbol(s) tied to a narrative phrase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawComponent {
    #[serde(default)]
    pub symbol: SymbolList,
    #[serde(default)]
    pub counterpart: String,
    #[serde(default)]
    pub role: String,
    /// Indices of direct children in the payload's `components` array.
    #[serde(default)]
    pub children: Vec<usize>,
}

/// Older responses send a bare string, newer ones a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SymbolList {
    One(String),
    Many(Vec<String>),
}

impl Default for SymbolList {
    fn default() -> Self {
        SymbolList::Many(Vec::new())
    }
}

impl SymbolList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SymbolList::One(symbol) => vec![symbol],
            SymbolList::Many(symbols) => symbols,
        }
    }
}

/// A micro token as sent on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawToken {
    #[serde(alias = "index")]
    pub range: Span,
    pub symbol: String,
    pub role: TokenRole,
    pub color_id: String,
    #[serde(default)]
    pub definition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_shapes() {
        let json = r#"{
            "latex": "x_n",
            "explanation": "your signal",
            "components": [
                {"symbol": "x_n", "counterpart": "your signal"},
                {"symbol": ["x", "n"], "counterpart": "signal", "role": "input", "children": [0]}
            ],
            "spark_chips": ["Why?"]
        }"#;
        let payload: ParsePayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.components[0].symbol, SymbolList::One("x_n".into()));
        assert_eq!(payload.components[1].clone().symbol.into_vec(), vec!["x", "n"]);
        assert_eq!(payload.components[1].children, vec![0]);
        assert_eq!(payload.suggestions, vec!["Why?"]);
        assert!(payload.tokens.is_empty());
    }

    #[test]
    fn test_token_wire_shape() {
        let json = r#"{"index": [0, 3], "symbol": "X_k", "role": "variable", "color_id": "var_blue"}"#;
        let token: RawToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.range, Span::new(0, 3));
        assert_eq!(token.role, TokenRole::Variable);
        assert_eq!(token.definition, None);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = r#"{"range": [0, 1], "symbol": "+", "role": "glue", "color_id": "x"}"#;
        assert!(serde_json::from_str::<RawToken>(json).is_err());
    }
}
