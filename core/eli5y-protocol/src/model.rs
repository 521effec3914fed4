use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::{FormulaId, GroupIndex, TokenIndex};
use crate::span::Span;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Syntactic role of a micro token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum TokenRole {
    Variable = 0,
    Constant = 1,
    Operator = 2,
    Function = 3,
}

/// A micro (syntax-level) unit of the expression.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    /// Char range into `Formula::latex`.
    pub range: Span,
    pub symbol: String,
    pub role: TokenRole,
    pub color_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub definition: Option<String>,
}

/// A macro (meaning-level) unit. One group may cover several disjoint
/// pieces of the expression; `latex[i]` is the source text of `ranges[i]`.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Group {
    pub ranges: Vec<Span>,
    pub latex: Vec<String>,
    pub label: String,
    pub color_id: String,
    /// Char range into `Formula::narrative`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub narrative_span: Option<Span>,
    /// Direct child groups.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<GroupIndex>,
}

/// The aggregate root. Never edited in place: a new capture is a new formula.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Formula {
    pub id: FormulaId,
    pub latex: String,
    pub tokens: Vec<Token>,
    pub groups: Vec<Group>,
    pub narrative: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
    /// Suggested follow-up questions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub suggestions: Vec<String>,
}

impl Formula {
    pub fn token(&self, index: TokenIndex) -> Option<&Token> {
        self.tokens.get(index.get())
    }

    pub fn group(&self, index: GroupIndex) -> Option<&Group> {
        self.groups.get(index.get())
    }

    /// Length of the expression in chars.
    pub fn latex_len(&self) -> usize {
        self.latex.chars().count()
    }
}

/// Which annotation set drives the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum ViewMode {
    /// Tokens, colored by their semantic color id.
    Micro = 0,
    /// Groups, colored by position through the adjacent-distinct assigner.
    #[default]
    Macro = 1,
    /// Groups, colored by their own color id; nesting allowed.
    Custom = 2,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Micro => "micro",
            ViewMode::Macro => "macro",
            ViewMode::Custom => "custom",
        }
    }
}

impl core::str::FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "micro" => Ok(ViewMode::Micro),
            "macro" => Ok(ViewMode::Macro),
            "custom" => Ok(ViewMode::Custom),
            _ => Err(UnknownViewMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode '{0}' (expected micro, macro or custom)")]
pub struct UnknownViewMode(pub String);

/// The region the user currently has focused, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "index", rename_all = "lowercase"))]
#[archive(check_bytes)]
pub enum Selection {
    #[default]
    None,
    Token(TokenIndex),
    Group(GroupIndex),
}
