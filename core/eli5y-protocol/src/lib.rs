pub mod ids;
pub mod span;

// Re-export core types for convenience
pub use ids::{FormulaId, GroupIndex, TokenIndex};
pub use span::{char_offset, Span};

pub mod model;
pub use model::*;

pub mod snapshot;
pub use snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
