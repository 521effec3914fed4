//! Span annotation and color assignment for formula highlighting.
//!
//! Everything here is a pure function of its arguments: no shared state, no
//! I/O, and identical inputs give byte-identical output, so callers can simply
//! recompute on every render.

pub mod annotate;
pub mod assign;
pub mod color;
pub mod config;
pub mod dialect;
pub mod paint;
pub mod palette;
pub mod view;

pub use annotate::{annotate, annotate_disjoint, annotate_with, ColorSpan};
pub use assign::{assign, assign_from, DEFAULT_POOL};
pub use color::{Color, ColorError};
pub use config::{ConfigError, RenderConfig};
pub use dialect::{Dialect, DialectKind, Html, Latex};
pub use paint::{paint, paint_colored, PaintedSegment, Segment};
pub use palette::{resolve, FALLBACK, GROUP_COLOR_IDS};
pub use view::{group_at, token_at, Highlighter, RenderedView};
