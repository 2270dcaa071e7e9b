//! Scene types: shapes, their style records and the per-frame draw list.
//!
//! Responsibilities:
//! - bind shared, read-only geometry to stroke/fill style parameters
//! - provide deterministic ordering (z-index + insertion order)

mod key;
mod list;
mod record;
mod shape;
mod z_index;

pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use record::ShapeStyleRecord;
pub use shape::{Outline, Shape, ShapeKind, ShapeRef};
pub use z_index::ZIndex;
