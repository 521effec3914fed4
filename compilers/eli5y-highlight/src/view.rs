//! Per-mode render pipeline: formula + mode + selection to markup and
//! painted narrative.

use eli5y_protocol::{Formula, GroupIndex, Selection, Span, TokenIndex, ViewMode};
use serde::Serialize;

use crate::annotate::{annotate_with, ColorSpan};
use crate::assign::{assign, assign_from};
use crate::color::Color;
use crate::config::RenderConfig;
use crate::paint::{paint_colored, PaintedSegment};
use crate::palette::resolve;

/// Everything the external renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub mode: ViewMode,
    /// Annotated expression in the configured dialect.
    pub markup: String,
    pub target_width: f32,
    /// Narrative runs; a single unowned run in micro mode.
    pub segments: Vec<PaintedSegment>,
    /// Region colors by group index (empty in micro mode).
    pub colors: Vec<Color>,
}

/// Stateless render pipeline. Cheap to call on every frame.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: RenderConfig,
}

impl Highlighter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, formula: &Formula, mode: ViewMode, selection: Selection) -> RenderedView {
        let colors = self.group_colors(formula, mode);

        let spans = match mode {
            ViewMode::Micro => token_spans(formula, selection),
            ViewMode::Macro | ViewMode::Custom => group_spans(formula, &colors, selection),
        };
        let markup = annotate_with(&self.config.dialect, &formula.latex, &spans);

        let segments = match mode {
            ViewMode::Micro => unpainted(&formula.narrative),
            ViewMode::Macro | ViewMode::Custom => {
                let narrative_spans: Vec<Option<Span>> =
                    formula.groups.iter().map(|g| g.narrative_span).collect();
                paint_colored(&formula.narrative, &narrative_spans, &colors)
            }
        };

        RenderedView {
            mode,
            markup,
            target_width: self.config.target_width,
            segments,
            colors,
        }
    }

    /// One color per group: positional in macro mode, semantic in custom mode.
    pub fn group_colors(&self, formula: &Formula, mode: ViewMode) -> Vec<Color> {
        match mode {
            ViewMode::Micro => Vec::new(),
            ViewMode::Macro => {
                let count = formula.groups.len() as isize;
                match &self.config.pool {
                    Some(pool) => assign_from(pool, count),
                    None => assign(count),
                }
            }
            ViewMode::Custom => formula.groups.iter().map(|g| resolve(&g.color_id)).collect(),
        }
    }
}

fn token_spans(formula: &Formula, selection: Selection) -> Vec<ColorSpan> {
    formula
        .tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let selected = selection == Selection::Token(TokenIndex(i as u32));
            ColorSpan::from_span(token.range, resolve(&token.color_id)).emphasized(selected)
        })
        .collect()
}

fn group_spans(formula: &Formula, colors: &[Color], selection: Selection) -> Vec<ColorSpan> {
    formula
        .groups
        .iter()
        .zip(colors)
        .enumerate()
        .flat_map(|(i, (group, color))| {
            let selected = selection == Selection::Group(GroupIndex(i as u32));
            group
                .ranges
                .iter()
                .map(move |range| ColorSpan::from_span(*range, *color).emphasized(selected))
        })
        .collect()
}

fn unpainted(text: &str) -> Vec<PaintedSegment> {
    if text.is_empty() {
        return Vec::new();
    }
    vec![PaintedSegment {
        text: text.to_string(),
        owner: None,
        color: None,
    }]
}

/// The token under a char offset of the expression.
pub fn token_at(formula: &Formula, offset: usize) -> Option<TokenIndex> {
    formula
        .tokens
        .iter()
        .position(|t| t.range.contains_offset(offset))
        .map(|i| TokenIndex(i as u32))
}

/// The innermost group with a range under a char offset of the expression.
/// Ties go to the lower index.
pub fn group_at(formula: &Formula, offset: usize) -> Option<GroupIndex> {
    formula
        .groups
        .iter()
        .enumerate()
        .filter_map(|(i, group)| {
            group
                .ranges
                .iter()
                .filter(|r| r.contains_offset(offset))
                .map(|r| r.len())
                .min()
                .map(|len| (len, i))
        })
        .min()
        .map(|(_, i)| GroupIndex(i as u32))
}
