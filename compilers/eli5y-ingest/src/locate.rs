use eli5y_protocol::{char_offset, Span};
use tracing::warn;

use crate::cleanup::Candidate;

/// Where a candidate's pieces sit in the expression and the narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub candidate: Candidate,
    /// One range per symbol, in symbol order.
    pub ranges: Vec<Span>,
    pub narrative_span: Option<Span>,
}

/// Char span of the first occurrence of `needle` in `haystack`.
pub fn find_span(haystack: &str, needle: &str) -> Option<Span> {
    if needle.is_empty() {
        return None;
    }
    let byte = haystack.find(needle)?;
    let start = char_offset(haystack, byte);
    Some(Span::new(start, start + needle.chars().count()))
}

/// Finds every symbol in `latex` and the counterpart in `narrative`.
///
/// Returns `None` (and logs) when the counterpart is given but missing or
/// when any symbol is missing. The counterpart is matched trimmed, the same
/// way duplicates are merged; a blank one leaves the group without a
/// narrative span.
pub fn locate(candidate: Candidate, latex: &str, narrative: &str) -> Option<Located> {
    let counterpart = candidate.counterpart.trim();
    let narrative_span = if counterpart.is_empty() {
        None
    } else {
        match find_span(narrative, counterpart) {
            Some(span) => Some(span),
            None => {
                warn!(counterpart, "counterpart not found in explanation, dropping component");
                return None;
            }
        }
    };

    if candidate.symbols.is_empty() {
        warn!(counterpart, "component has no symbols, dropping it");
        return None;
    }

    let mut ranges = Vec::with_capacity(candidate.symbols.len());
    for symbol in &candidate.symbols {
        match find_span(latex, symbol) {
            Some(span) => ranges.push(span),
            None => {
                warn!(symbol = symbol.as_str(), "symbol not found in latex, dropping component");
                return None;
            }
        }
    }

    Some(Located {
        candidate,
        ranges,
        narrative_span,
    })
}
