//! Narrative painter: single-owner resolution for nested narrative spans.
//!
//! Unlike the annotator this never nests anything. Each character ends up
//! owned by at most one group (the shortest span covering it) and the text is
//! cut into maximal runs of equal ownership for a rich-text renderer.

use eli5y_protocol::Span;
use serde::Serialize;

use crate::color::Color;

/// A maximal run of narrative text with a single owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    /// Index of the owning group, `None` for default styling.
    pub owner: Option<usize>,
}

impl Segment {
    /// The owner's entry in `colors` (usually the assigner's sequence).
    pub fn color(&self, colors: &[Color]) -> Option<Color> {
        self.owner.and_then(|owner| colors.get(owner).copied())
    }
}

/// A [`Segment`] with its color resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaintedSegment {
    pub text: String,
    pub owner: Option<usize>,
    pub color: Option<Color>,
}

/// Splits `text` into owner runs. `spans[i]` is group `i`'s narrative span.
///
/// Longer spans are painted first and shorter ones over them, so a phrase
/// nested inside a wider span keeps its own owner. Equal lengths paint in
/// index order (the later index wins). Invalid spans are ignored. The
/// segments tile `text` exactly.
pub fn paint(text: &str, spans: &[Option<Span>]) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let mut owners: Vec<Option<usize>> = vec![None; chars.len()];

    let mut valid: Vec<(usize, Span)> = spans
        .iter()
        .enumerate()
        .filter_map(|(index, span)| span.filter(|s| s.within(chars.len())).map(|s| (index, s)))
        .collect();
    valid.sort_by(|(ia, a), (ib, b)| b.len().cmp(&a.len()).then(ia.cmp(ib)));

    for (index, span) in valid {
        for owner in &mut owners[span.range()] {
            *owner = Some(index);
        }
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (c, owner) in chars.into_iter().zip(owners) {
        match segments.last_mut() {
            Some(last) if last.owner == owner => last.text.push(c),
            _ => segments.push(Segment {
                text: c.to_string(),
                owner,
            }),
        }
    }

    segments
}

/// [`paint`] followed by color resolution against `colors`.
pub fn paint_colored(text: &str, spans: &[Option<Span>], colors: &[Color]) -> Vec<PaintedSegment> {
    paint(text, spans)
        .into_iter()
        .map(|segment| PaintedSegment {
            color: segment.color(colors),
            text: segment.text,
            owner: segment.owner,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn owners(segments: &[Segment]) -> Vec<(usize, usize, Option<usize>)> {
        let mut pos = 0;
        segments
            .iter()
            .map(|s| {
                let len = s.text.chars().count();
                let run = (pos, pos + len, s.owner);
                pos += len;
                run
            })
            .collect()
    }

    #[test]
    fn test_nested_span_splits_outer() {
        let text = "abcdefghijklmnopqrst";
        let segments = paint(text, &[Some(Span::new(0, 20)), Some(Span::new(5, 10))]);
        assert_eq!(owners(&segments), vec![(0, 5, Some(0)), (5, 10, Some(1)), (10, 20, Some(0))]);
        assert_eq!(segments[1].text, "fghij");
    }

    #[test]
    fn test_precedence_ignores_input_order() {
        let text = "abcdefghijklmnopqrst";
        let segments = paint(text, &[Some(Span::new(5, 10)), Some(Span::new(0, 20))]);
        assert_eq!(owners(&segments), vec![(0, 5, Some(1)), (5, 10, Some(0)), (10, 20, Some(1))]);
    }

    #[test]
    fn test_unowned_runs() {
        let segments = paint("one two three", &[None, Some(Span::new(4, 7))]);
        assert_eq!(
            segments,
            vec![
                Segment { text: "one ".into(), owner: None },
                Segment { text: "two".into(), owner: Some(1) },
                Segment { text: " three".into(), owner: None },
            ]
        );
    }

    #[test]
    fn test_equal_length_later_index_wins() {
        let segments = paint("abcd", &[Some(Span::new(0, 2)), Some(Span::new(0, 2))]);
        assert_eq!(owners(&segments), vec![(0, 2, Some(1)), (2, 4, None)]);
    }

    #[test]
    fn test_invalid_spans_ignored() {
        let segments = paint(
            "abc",
            &[Some(Span::new(1, 9)), Some(Span::new(2, 2)), Some(Span::new(2, 1))],
        );
        assert_eq!(segments, vec![Segment { text: "abc".into(), owner: None }]);
    }

    #[test]
    fn test_empty_text() {
        assert!(paint("", &[Some(Span::new(0, 1))]).is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let segments = paint("ωt → θ", &[Some(Span::new(5, 6))]);
        assert_eq!(segments.last().map(|s| s.text.as_str()), Some("θ"));
        assert_eq!(segments.last().and_then(|s| s.owner), Some(0));
    }

    #[test]
    fn test_color_resolution() {
        let colors = [Color::rgb(1, 1, 1)];
        let painted = paint_colored(
            "ab cd",
            &[Some(Span::new(0, 2)), Some(Span::new(3, 5))],
            &colors,
        );
        assert_eq!(painted[0].color, Some(Color::rgb(1, 1, 1)));
        assert_eq!(painted[1].color, None);
        // Owner 1 has no entry in the sequence
        assert_eq!(painted[2].owner, Some(1));
        assert_eq!(painted[2].color, None);
    }

    proptest! {
        #[test]
        fn test_segments_tile_text(
            text in "[a-zα-ω ]{0,40}",
            raw in prop::collection::vec(prop::option::of((0usize..45, 0usize..45)), 0..10),
        ) {
            let spans: Vec<Option<Span>> = raw.into_iter().map(|o| o.map(Span::from)).collect();
            let segments = paint(&text, &spans);

            let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
            prop_assert_eq!(&joined, &text);

            for pair in segments.windows(2) {
                prop_assert_ne!(pair[0].owner, pair[1].owner);
            }
            prop_assert!(segments.iter().all(|s| !s.text.is_empty()));
            prop_assert_eq!(paint(&text, &spans), segments);
        }

        #[test]
        fn test_shortest_covering_span_owns(
            text in "[a-z]{1,30}",
            raw in prop::collection::vec((0usize..32, 0usize..32), 1..8),
        ) {
            let spans: Vec<Option<Span>> = raw.into_iter().map(|r| Some(Span::from(r))).collect();
            let len = text.chars().count();
            let segments = paint(&text, &spans);

            for (start, end, owner) in owners(&segments) {
                for pos in start..end {
                    let shortest = spans
                        .iter()
                        .flatten()
                        .filter(|s| s.within(len) && s.contains_offset(pos))
                        .map(|s| s.len())
                        .min();
                    match owner {
                        Some(i) => prop_assert_eq!(spans[i].map(|s| s.len()), shortest),
                        None => prop_assert_eq!(shortest, None),
                    }
                }
            }
        }
    }
}
