//! Shipping corridor containment.
//!
//! ```rust
//! use geo::{Geometry, LineString};
//! use marga::core::GeoPoint;
//! use marga::corridor::{CorridorConfig, CorridorFilter};
//!
//! let lane = Geometry::LineString(LineString::from(vec![(5.0, 60.0), (6.0, 60.0)]));
//! let corridor = CorridorFilter::new(vec![lane], &CorridorConfig::default()).unwrap();
//! assert!(corridor.contains(GeoPoint::new(5.5, 60.0)).unwrap());
//! ```

mod filter;
mod spatial_index;

pub use filter::{CorridorConfig, CorridorFilter};
pub use spatial_index::{CorridorPart, IndexedPart, PartIndex};
