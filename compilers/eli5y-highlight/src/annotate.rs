//! Range annotator: wraps colored char ranges of a text in region markers.
//!
//! Spans are compiled into open/close events and replayed against the text.
//! The event order makes disjoint and strictly nested spans come out as
//! balanced, correctly nested markup. Crossing spans (partial overlap without
//! containment) have no well-formed rendering and are not supported; they get
//! whatever the event order produces.

use core::cmp::Ordering;
use core::ops::Range;

use eli5y_protocol::Span;
use tracing::debug;

use crate::color::Color;
use crate::dialect::{Dialect, Latex};

/// One colored region to annotate, in char offsets.
///
/// Offsets are signed so that garbage from upstream (`-1`) can be represented
/// and dropped instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpan {
    pub start: isize,
    pub end: isize,
    pub color: Color,
    /// Selected regions get the dialect's emphasis marker around the color.
    pub emphasized: bool,
}

impl ColorSpan {
    pub fn new(range: Range<isize>, color: Color) -> Self {
        Self {
            start: range.start,
            end: range.end,
            color,
            emphasized: false,
        }
    }

    pub fn from_span(span: Span, color: Color) -> Self {
        let offset = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
        Self::new(offset(span.start)..offset(span.end), color)
    }

    pub fn emphasized(mut self, emphasized: bool) -> Self {
        self.emphasized = emphasized;
        self
    }

    /// The span as unsigned offsets, if it is non-empty and inside `len` chars.
    fn bounded(&self, len: usize) -> Option<(usize, usize)> {
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        (start < end && end <= len).then_some((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    // Closes sort before opens at the same position
    Close,
    Open,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    pos: usize,
    edge: Edge,
    len: usize,
    order: usize,
    color: Color,
    emphasized: bool,
}

impl Event {
    fn replay<D: Dialect + ?Sized>(&self, dialect: &D, out: &mut String) {
        match self.edge {
            Edge::Open => dialect.open(out, self.color, self.emphasized),
            Edge::Close => dialect.close(out, self.color, self.emphasized),
        }
    }
}

/// Orders events so that markers nest: closes before opens, outer spans
/// open first and close last. Equal-length spans keep input order on open
/// and reverse it on close.
fn event_order(a: &Event, b: &Event) -> Ordering {
    a.pos
        .cmp(&b.pos)
        .then(a.edge.cmp(&b.edge))
        .then_with(|| match a.edge {
            Edge::Open => b.len.cmp(&a.len).then(a.order.cmp(&b.order)),
            Edge::Close => a.len.cmp(&b.len).then(b.order.cmp(&a.order)),
        })
}

/// Spans that fit in `len` chars, in input order, with their unsigned bounds.
fn retain_in_bounds(spans: &[ColorSpan], len: usize) -> Vec<(usize, usize, &ColorSpan)> {
    spans
        .iter()
        .filter_map(|span| match span.bounded(len) {
            Some((start, end)) => Some((start, end, span)),
            None => {
                debug!(start = span.start, end = span.end, len, "dropping span outside text");
                None
            }
        })
        .collect()
}

fn compile_events(spans: &[ColorSpan], len: usize) -> Vec<Event> {
    let mut events = Vec::with_capacity(spans.len() * 2);

    for (order, (start, end, span)) in retain_in_bounds(spans, len).into_iter().enumerate() {
        let event = |pos, edge| Event {
            pos,
            edge,
            len: end - start,
            order,
            color: span.color,
            emphasized: span.emphasized,
        };
        events.push(event(start, Edge::Open));
        events.push(event(end, Edge::Close));
    }

    events.sort_by(event_order);
    events
}

/// Annotates `text` with [`Latex`] markers.
pub fn annotate(text: &str, spans: &[ColorSpan]) -> String {
    annotate_with(&Latex, text, spans)
}

/// Annotates `text`, wrapping every in-bounds span in `dialect` markers.
///
/// Spans with `start < 0`, `end > len` or `end <= start` are dropped.
pub fn annotate_with<D: Dialect + ?Sized>(dialect: &D, text: &str, spans: &[ColorSpan]) -> String {
    let len = text.chars().count();
    let events = compile_events(spans, len);

    let mut out = String::with_capacity(text.len() + events.len() * 16);
    let mut pending = events.iter().peekable();

    for (pos, c) in text.chars().enumerate() {
        while let Some(event) = pending.next_if(|e| e.pos == pos) {
            event.replay(dialect, &mut out);
        }
        dialect.push_char(&mut out, c);
    }

    // Everything left sits at `len`
    for event in pending {
        event.replay(dialect, &mut out);
    }

    out
}

/// Splice-from-the-right annotation for callers whose spans never overlap.
///
/// Spans are applied in descending start order; a span reaching into one
/// already applied is dropped. For disjoint input the output matches
/// [`annotate_with`].
pub fn annotate_disjoint<D: Dialect + ?Sized>(
    dialect: &D,
    text: &str,
    spans: &[ColorSpan],
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut retained = retain_in_bounds(spans, chars.len());
    retained.sort_by(|a, b| b.0.cmp(&a.0));

    let push_run = |out: &mut String, run: &[char]| {
        for c in run {
            dialect.push_char(out, *c);
        }
    };

    // Pieces are produced right to left and reversed at the end.
    let mut pieces = Vec::with_capacity(retained.len() * 2 + 1);
    let mut cursor = chars.len();

    for (start, end, span) in retained {
        if end > cursor {
            debug!(start, end, "dropping span overlapping a later span");
            continue;
        }

        let mut tail = String::new();
        push_run(&mut tail, &chars[end..cursor]);
        pieces.push(tail);

        let mut wrapped = String::new();
        dialect.open(&mut wrapped, span.color, span.emphasized);
        push_run(&mut wrapped, &chars[start..end]);
        dialect.close(&mut wrapped, span.color, span.emphasized);
        pieces.push(wrapped);

        cursor = start;
    }

    let mut head = String::new();
    push_run(&mut head, &chars[..cursor]);
    pieces.push(head);

    pieces.reverse();
    pieces.concat()
}
