//! Geometry, compositing and extraction.
//!
//! # Transform Order
//!
//! When a crop is applied, the stages run in this order:
//! 1. Rotated bounds of the source at the session's rotation
//! 2. Composite: source rotated about its centre into a buffer of that size
//! 3. Extract: the crop rectangle copied out of the composite
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise, wrapped to [0, 360)
//! - Crop rectangles are in composite pixels, not normalized
//! - Origin is top-left corner

mod bounds;
mod composite;
mod extract;
mod rect;
mod sample;

pub use bounds::{normalize_rotation, quarter_turns, rotated_bounds};
pub use composite::{composite, Background, CompositeError, CompositeLimits};
pub use extract::{extract, CropOutOfBoundsError};
pub use rect::{CropRect, EDGE_EPSILON};
