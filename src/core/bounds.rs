//! Axis-aligned bounding box in geographic or projected units.
//!
//! [`BoundingBox`] is the extent a linear navigability grid is stretched
//! over. A valid box has strictly positive width and height; the checked
//! constructor [`BoundingBox::new`] enforces that, while
//! [`BoundingBox::empty`] + [`BoundingBox::expand_to_include`] accumulate
//! the total bounds of a feature collection.
//!
//! ```rust
//! use marga::core::BoundingBox;
//!
//! let mut bounds = BoundingBox::empty();
//! bounds.expand_to_include(1.0, 1.0);
//! bounds.expand_to_include(9.0, 9.0);
//! assert_eq!(bounds.width(), 8.0);
//! assert!(bounds.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x (west / left)
    pub min_x: f64,
    /// Minimum y (south / bottom)
    pub min_y: f64,
    /// Maximum x (east / right)
    pub max_x: f64,
    /// Maximum y (north / top)
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting degenerate or non-finite extents.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let bounds = Self {
            min_x,
            min_y,
            max_x,
            max_y,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Create an empty (invalid) bounding box.
    ///
    /// The empty box has min > max, so it will expand to fit any point.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Check if the box has not been expanded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width (x extent).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height (y extent).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is inside the box (edges included).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Expand the box to include a point.
    #[inline]
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Ensure `max > min` on both axes and all edges and extents are finite.
    pub fn validate(&self) -> Result<()> {
        let finite = self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite();
        if !finite {
            return Err(RouteError::input(format!(
                "bounding box has non-finite edges: {self:?}"
            )));
        }
        if !self.width().is_finite() || !self.height().is_finite() {
            return Err(RouteError::input(format!(
                "bounding box extent overflows: {} x {}",
                self.width(),
                self.height()
            )));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(RouteError::input(format!(
                "degenerate bounding box ({} x {}): features must span a non-zero area",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}

impl From<geo::Rect<f64>> for BoundingBox {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}
