//! Post-processing of model output before location.
//!
//! Models sometimes split one multi-symbol component into several entries
//! sharing a counterpart, and sometimes emit bare operators or exponents as
//! components of their own. Both are repaired here.

use tracing::info;

use crate::glue::is_syntactic_glue;
use crate::payload::RawComponent;

/// A component being cleaned, remembering which payload entries it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub symbols: Vec<String>,
    pub counterpart: String,
    pub role: String,
    /// Child references as payload indices.
    pub children: Vec<usize>,
    /// Payload indices merged into this candidate, first one first.
    pub origins: Vec<usize>,
}

impl Candidate {
    pub fn from_raw(index: usize, raw: RawComponent) -> Self {
        Self {
            symbols: raw.symbol.into_vec(),
            counterpart: raw.counterpart,
            role: raw.role,
            children: raw.children,
            origins: vec![index],
        }
    }
}

fn extend_unique<T: PartialEq + Clone>(into: &mut Vec<T>, from: &[T]) {
    for item in from {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}

/// Folds candidates with the same non-empty (trimmed) counterpart into the
/// first of them. Symbols and children are concatenated without duplicates;
/// the first candidate's role wins.
pub fn merge_duplicate_counterparts(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.counterpart.trim();
        let existing = if key.is_empty() {
            None
        } else {
            merged.iter_mut().find(|m| m.counterpart.trim() == key)
        };

        match existing {
            Some(existing) => {
                extend_unique(&mut existing.symbols, &candidate.symbols);
                extend_unique(&mut existing.children, &candidate.children);
                existing.origins.extend_from_slice(&candidate.origins);
                info!(
                    counterpart = key,
                    symbols = ?existing.symbols,
                    "merged duplicate counterpart"
                );
            }
            None => merged.push(candidate),
        }
    }

    merged
}

/// Drops candidates made only of glue whose symbols all occur inside some
/// other candidate. Needs at least two candidates to do anything.
pub fn drop_syntactic_glue(candidates: Vec<Candidate>) -> Vec<Candidate> {
    if candidates.len() < 2 {
        return candidates;
    }

    let joined: Vec<String> = candidates.iter().map(|c| c.symbols.join(" ")).collect();
    let is_glue = |i: usize| {
        let symbols = &candidates[i].symbols;
        !symbols.is_empty()
            && symbols.iter().all(|s| is_syntactic_glue(s))
            && joined
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && symbols.iter().all(|s| other.contains(s.trim())))
    };
    let glue: Vec<bool> = (0..candidates.len()).map(is_glue).collect();

    let dropped = glue.iter().filter(|g| **g).count();
    if dropped > 0 {
        info!(dropped, "dropping glue components");
    }

    candidates
        .into_iter()
        .zip(glue)
        .filter_map(|(candidate, glue)| (!glue).then_some(candidate))
        .collect()
}
