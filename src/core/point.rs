//! Point and coordinate types for the navigability grid.

use serde::{Deserialize, Serialize};

/// Grid coordinates (row, column) into a navigability grid.
///
/// Row 0 is the first row of the backing buffer. For bounding-box grids
/// that is the southern edge; for raster grids it is the top image row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelCoord {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl PixelCoord {
    /// Create a new pixel coordinate
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another coordinate
    #[inline]
    pub fn manhattan_distance(&self, other: &PixelCoord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Chebyshev distance (max of row and column distance)
    #[inline]
    pub fn chebyshev_distance(&self, other: &PixelCoord) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Whether `other` is one of the 8 neighbors of this cell.
    #[inline]
    pub fn is_adjacent(&self, other: &PixelCoord) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }

    /// Offset by a signed (row, col) delta, if the result stays inside `height × width`.
    #[inline]
    pub fn offset(&self, dr: isize, dc: isize, height: usize, width: usize) -> Option<PixelCoord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < height && col < width).then_some(PixelCoord::new(row, col))
    }
}

impl From<(usize, usize)> for PixelCoord {
    fn from((row, col): (usize, usize)) -> Self {
        PixelCoord::new(row, col)
    }
}

/// Geographic point (longitude, latitude) in WGS84 degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new geographic point
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Planar distance in degrees. Not geodesic.
    #[inline]
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` (t = 0 → self, t = 1 → other).
    #[inline]
    pub fn lerp(&self, other: &GeoPoint, t: f64) -> GeoPoint {
        GeoPoint::new(
            self.lon + t * (other.lon - self.lon),
            self.lat + t * (other.lat - self.lat),
        )
    }

    /// As a `[lon, lat]` pair (GeoJSON position order).
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        GeoPoint::new(lon, lat)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        GeoPoint::new(lon, lat)
    }
}
