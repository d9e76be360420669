//! Core value types shared across the crate.
//!
//! - [`GeoPoint`]: WGS84 (longitude, latitude) in degrees
//! - [`PixelCoord`]: (row, column) index into a navigability grid
//! - [`BoundingBox`]: extent in geographic or projected units

mod bounds;
mod point;

pub use bounds::BoundingBox;
pub use point::{GeoPoint, PixelCoord};
