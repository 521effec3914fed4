//! Boundary between the inference service and the highlight engine.
//!
//! Payloads arrive as loosely shaped JSON. Everything that reaches a
//! [`Formula`] from here satisfies the data model's invariants: every range
//! lies inside its text, child links point at existing groups and form no
//! cycle.

pub mod cleanup;
pub mod glue;
pub mod hierarchy;
pub mod locate;
pub mod payload;

use chrono::{SecondsFormat, Utc};
use eli5y_highlight::GROUP_COLOR_IDS;
use eli5y_protocol::{Formula, FormulaId, Group, GroupIndex, Token};
use tracing::{debug, warn};

use crate::cleanup::{drop_syntactic_glue, merge_duplicate_counterparts, Candidate};
use crate::hierarchy::GroupHierarchy;
use crate::locate::{locate, Located};
pub use crate::payload::{ParsePayload, RawComponent, RawToken, SymbolList};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("payload has no latex")]
    EmptyLatex,
    #[error("no components identified; the latex may be malformed")]
    NoComponents,
    #[error("component {component} lists child {child}, but there are only {count} components")]
    ChildOutOfRange {
        component: usize,
        child: usize,
        count: usize,
    },
    #[error("group '{label}' is its own ancestor")]
    CyclicChildren { label: String },
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses and validates a JSON payload into a fresh [`Formula`].
pub fn from_json(json: &str) -> Result<Formula, IngestError> {
    let payload: ParsePayload = serde_json::from_str(json)?;
    ingest(payload)
}

/// Validates `payload`, stamping a new id and the current time.
pub fn ingest(payload: ParsePayload) -> Result<Formula, IngestError> {
    let id = FormulaId::new(uuid::Uuid::new_v4().to_string());
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    ingest_with(payload, id, created_at)
}

/// [`ingest`] with a caller-chosen id and timestamp.
pub fn ingest_with(
    payload: ParsePayload,
    id: FormulaId,
    created_at: String,
) -> Result<Formula, IngestError> {
    let ParsePayload {
        latex,
        explanation,
        components,
        tokens,
        suggestions,
    } = payload;

    if latex.trim().is_empty() {
        return Err(IngestError::EmptyLatex);
    }
    if components.is_empty() {
        return Err(IngestError::NoComponents);
    }
    check_child_indices(&components)?;

    let candidates: Vec<Candidate> = components
        .into_iter()
        .enumerate()
        .map(|(i, raw)| Candidate::from_raw(i, raw))
        .collect();
    let candidates = drop_syntactic_glue(merge_duplicate_counterparts(candidates));

    let located: Vec<Located> = candidates
        .into_iter()
        .filter_map(|candidate| locate(candidate, &latex, &explanation))
        .collect();
    if located.is_empty() {
        return Err(IngestError::NoComponents);
    }

    let groups = build_groups(located)?;
    let mut formula = Formula {
        id,
        latex,
        tokens: Vec::new(),
        groups,
        narrative: explanation,
        created_at,
        suggestions,
    };
    formula.tokens = validate_tokens(tokens, formula.latex_len());
    debug!(
        groups = formula.groups.len(),
        tokens = formula.tokens.len(),
        "ingested formula"
    );

    Ok(formula)
}

fn check_child_indices(components: &[RawComponent]) -> Result<(), IngestError> {
    let count = components.len();
    for (component, raw) in components.iter().enumerate() {
        for &child in &raw.children {
            if child >= count {
                return Err(IngestError::ChildOutOfRange { component, child, count });
            }
            if child == component {
                return Err(IngestError::CyclicChildren {
                    label: raw.role.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Turns located candidates into groups, translating payload child indices
/// into group indices. Links to dropped components disappear, as do links
/// between entries that were merged into the same group.
fn build_groups(located: Vec<Located>) -> Result<Vec<Group>, IngestError> {
    let mut group_of = std::collections::HashMap::new();
    for (group, item) in located.iter().enumerate() {
        for &origin in &item.candidate.origins {
            group_of.insert(origin, GroupIndex(group as u32));
        }
    }

    let groups: Vec<Group> = located
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let own = GroupIndex(i as u32);
            let mut children = Vec::new();
            for child in &item.candidate.children {
                match group_of.get(child) {
                    Some(&group) if group != own && !children.contains(&group) => {
                        children.push(group)
                    }
                    Some(_) => {}
                    None => debug!(child, "child component was dropped"),
                }
            }

            Group {
                ranges: item.ranges,
                latex: item.candidate.symbols,
                label: item.candidate.role,
                color_id: GROUP_COLOR_IDS[i % GROUP_COLOR_IDS.len()].to_string(),
                narrative_span: item.narrative_span,
                children,
            }
        })
        .collect();

    let links: Vec<Vec<GroupIndex>> = groups.iter().map(|g| g.children.clone()).collect();
    let hierarchy = GroupHierarchy::new(&links);
    if let Some(group) = hierarchy.find_cycle() {
        return Err(IngestError::CyclicChildren {
            label: groups[group.get()].label.clone(),
        });
    }
    debug!(roots = ?hierarchy.roots(), "group hierarchy is acyclic");

    Ok(groups)
}

fn validate_tokens(tokens: Vec<RawToken>, latex_len: usize) -> Vec<Token> {
    tokens
        .into_iter()
        .filter_map(|raw| {
            if !raw.range.within(latex_len) {
                warn!(
                    symbol = raw.symbol.as_str(),
                    start = raw.range.start,
                    end = raw.range.end,
                    "token outside latex, dropping it"
                );
                return None;
            }
            Some(Token {
                range: raw.range,
                symbol: raw.symbol,
                role: raw.role,
                color_id: raw.color_id,
                definition: raw.definition,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eli5y_protocol::Span;

    const DFT: &str = r#"{
        "latex": "X_k = \\frac{1}{N} \\sum_{n=0}^{N-1} x_n e^{i2\\pi k\\frac{n}{N}}",
        "explanation": "To find the energy at a particular frequency, spin your signal around a circle and average points along the path.",
        "components": [
            {"symbol": ["X_k"], "counterpart": "the energy at a particular frequency", "role": "output coefficient"},
            {"symbol": ["x_n"], "counterpart": "your signal", "role": "input samples"},
            {"symbol": ["\\frac{1}{N}", "\\sum_{n=0}^{N-1}"], "counterpart": "average points along the path", "role": "averaging", "children": [4]},
            {"symbol": ["="], "counterpart": "find"},
            {"symbol": ["\\sum_{n=0}^{N-1}"], "counterpart": "points", "role": "summation"},
            {"symbol": ["y"], "counterpart": "nowhere to be found"}
        ],
        "tokens": [
            {"index": [0, 3], "symbol": "X_k", "role": "variable", "color_id": "var_blue"},
            {"index": [60, 99], "symbol": "?", "role": "constant", "color_id": "const_red"}
        ]
    }"#;

    fn dft() -> Formula {
        let payload: ParsePayload = serde_json::from_str(DFT).unwrap();
        ingest_with(payload, FormulaId::new("dft"), "2026-01-01T00:00:00Z".into()).unwrap()
    }

    #[test]
    fn test_ingest_dft() {
        let formula = dft();

        // "=" is glue, "y" is missing from the latex
        let labels: Vec<&str> = formula.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["output coefficient", "input samples", "averaging", "summation"]);

        let averaging = &formula.groups[2];
        assert_eq!(averaging.ranges, vec![Span::new(6, 17), Span::new(18, 34)]);
        assert_eq!(averaging.children, vec![GroupIndex(3)]);
        assert_eq!(averaging.color_id, "group_purple");

        let narrative_start = formula.narrative.find("average").unwrap();
        assert_eq!(averaging.narrative_span.map(|s| s.start), Some(narrative_start));
        assert_eq!(formula.groups[3].narrative_span.map(|s| s.len()), Some("points".len()));

        // Second token runs off the end
        assert_eq!(formula.tokens.len(), 1);
        assert_eq!(formula.id.as_str(), "dft");
    }

    #[test]
    fn test_ingest_stamps_identity() {
        let payload: ParsePayload = serde_json::from_str(DFT).unwrap();
        let a = ingest(payload.clone()).unwrap();
        let b = ingest(payload).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.created_at.ends_with('Z'));
    }

    #[test]
    fn test_merged_components_share_group() {
        let json = r#"{
            "latex": "s_1^2 + s_2^2",
            "explanation": "add their individual spreads",
            "components": [
                {"symbol": "s_1^2", "counterpart": "their individual spreads", "children": [1]},
                {"symbol": "s_2^2", "counterpart": "their individual spreads"}
            ]
        }"#;
        let formula = from_json(json).unwrap();
        assert_eq!(formula.groups.len(), 1);
        assert_eq!(formula.groups[0].latex, vec!["s_1^2", "s_2^2"]);
        assert_eq!(formula.groups[0].ranges, vec![Span::new(0, 5), Span::new(8, 13)]);
        assert!(formula.groups[0].children.is_empty());
    }

    #[test]
    fn test_merge_with_stray_whitespace() {
        let json = r#"{
            "latex": "s_1 + s_2",
            "explanation": "add their spreads.",
            "components": [
                {"symbol": "s_1", "counterpart": "their spreads "},
                {"symbol": "s_2", "counterpart": "their spreads"}
            ]
        }"#;
        let formula = from_json(json).unwrap();
        assert_eq!(formula.groups.len(), 1);
        assert_eq!(formula.groups[0].ranges, vec![Span::new(0, 3), Span::new(6, 9)]);
        assert_eq!(formula.groups[0].narrative_span, Some(Span::new(4, 17)));
    }

    #[test]
    fn test_blank_counterpart_paints_nothing() {
        let json = r#"{"latex": "a+b", "explanation": "add a to b", "components": [{"symbol": "a", "counterpart": " "}]}"#;
        let formula = from_json(json).unwrap();
        assert_eq!(formula.groups[0].narrative_span, None);
    }

    #[test]
    fn test_rejections() {
        let empty_latex = r#"{"latex": " ", "explanation": "x", "components": [{"symbol": "x", "counterpart": "x"}]}"#;
        assert!(matches!(from_json(empty_latex), Err(IngestError::EmptyLatex)));

        let no_components = r#"{"latex": "x", "explanation": "x", "components": []}"#;
        assert!(matches!(from_json(no_components), Err(IngestError::NoComponents)));

        let none_located = r#"{"latex": "x", "explanation": "x", "components": [{"symbol": "q", "counterpart": "x"}]}"#;
        assert!(matches!(from_json(none_located), Err(IngestError::NoComponents)));

        let bad_child = r#"{"latex": "x", "explanation": "x", "components": [{"symbol": "x", "counterpart": "x", "children": [3]}]}"#;
        assert!(matches!(
            from_json(bad_child),
            Err(IngestError::ChildOutOfRange { component: 0, child: 3, count: 1 })
        ));

        assert!(matches!(from_json("{"), Err(IngestError::Json(_))));
    }

    #[test]
    fn test_cycles_rejected() {
        let json = r#"{
            "latex": "a b",
            "explanation": "first second",
            "components": [
                {"symbol": "a", "counterpart": "first", "role": "A", "children": [1]},
                {"symbol": "b", "counterpart": "second", "role": "B", "children": [0]}
            ]
        }"#;
        assert!(matches!(from_json(json), Err(IngestError::CyclicChildren { .. })));

        let self_loop = r#"{"latex": "a", "explanation": "a", "components": [{"symbol": "a", "counterpart": "a", "role": "A", "children": [0]}]}"#;
        match from_json(self_loop) {
            Err(IngestError::CyclicChildren { label }) => assert_eq!(label, "A"),
            other => panic!("expected a cycle error, got {other:?}"),
        }
    }
}
