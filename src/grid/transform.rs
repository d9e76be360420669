//! Bidirectional mapping between geographic coordinates and grid cells.
//!
//! Two variants:
//!
//! - [`LinearTransform`]: a bounding box stretched over a fixed `H × W` grid.
//!   Cell `(r, c)` sits at `(xs[c], ys[r])` where `xs`/`ys` are evenly spaced
//!   from the box minimum to the box maximum inclusive. Row 0 is the southern
//!   edge. Geographic → pixel truncates and clamps, so it never fails.
//! - [`AffineTransform`]: the six georeferencing coefficients of a raster plus
//!   its native CRS. Pixel centers go through the affine, then get reprojected
//!   to WGS84 (and back for the inverse).
//!
//! Both round-trip within one cell: `geo_to_pixel(pixel_to_geo(p))` is `p`
//! or one of its neighbors.

use log::trace;

use crate::core::{BoundingBox, GeoPoint, PixelCoord};
use crate::error::{Result, RouteError};
use crate::projection::{Crs, CrsTransformer};

/// Linear bounding-box transform over a fixed grid.
#[derive(Clone, Debug)]
pub struct LinearTransform {
    bounds: BoundingBox,
    height: usize,
    width: usize,
    /// Longitude of every column (length `width`).
    xs: Vec<f64>,
    /// Latitude of every row (length `height`).
    ys: Vec<f64>,
}

/// Evenly spaced samples from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

impl LinearTransform {
    /// Create a transform for `bounds` over a `height × width` grid.
    pub fn new(bounds: BoundingBox, height: usize, width: usize) -> Result<Self> {
        bounds.validate()?;
        if height < 2 || width < 2 {
            return Err(RouteError::input(format!(
                "grid must be at least 2x2 cells, got {height}x{width}"
            )));
        }
        Ok(Self {
            xs: linspace(bounds.min_x, bounds.max_x, width),
            ys: linspace(bounds.min_y, bounds.max_y, height),
            bounds,
            height,
            width,
        })
    }

    /// The bounding box this grid spans.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Column sample coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Row sample coordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Geographic spacing between neighboring cells (dx, dy).
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.bounds.width() / (self.width - 1) as f64,
            self.bounds.height() / (self.height - 1) as f64,
        )
    }

    /// Map a cell to its sample coordinate.
    ///
    /// Out-of-range indices are clamped to the last row/column.
    #[inline]
    pub fn pixel_to_geo(&self, p: PixelCoord) -> GeoPoint {
        let col = p.col.min(self.width - 1);
        let row = p.row.min(self.height - 1);
        GeoPoint::new(self.xs[col], self.ys[row])
    }

    /// Map a geographic point to the cell it falls in, clamped to the grid.
    #[inline]
    pub fn geo_to_pixel(&self, g: GeoPoint) -> PixelCoord {
        let fx = (g.lon - self.bounds.min_x) / self.bounds.width() * (self.width - 1) as f64;
        let fy = (g.lat - self.bounds.min_y) / self.bounds.height() * (self.height - 1) as f64;
        PixelCoord::new(
            clamp_index(fy, self.height),
            clamp_index(fx, self.width),
        )
    }
}

/// Truncate a fractional index and clamp it into `[0, n - 1]`. NaN maps to 0.
#[inline]
fn clamp_index(f: f64, n: usize) -> usize {
    if f.is_nan() || f <= 0.0 {
        0
    } else {
        (f.floor() as usize).min(n - 1)
    }
}

/// Affine raster georeference with reprojection to WGS84.
///
/// Coefficients use GDAL ordering `[c, a, b, f, d, e]`:
///
/// ```text
/// x = c + col * a + row * b
/// y = f + col * d + row * e
/// ```
pub struct AffineTransform {
    coefficients: [f64; 6],
    /// Inverse affine: (x, y) -> (col, row), same ordering.
    inverse: [f64; 6],
    height: usize,
    width: usize,
    crs: Option<Crs>,
    to_wgs84: Option<CrsTransformer>,
    from_wgs84: Option<CrsTransformer>,
}

impl std::fmt::Debug for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffineTransform")
            .field("coefficients", &self.coefficients)
            .field("height", &self.height)
            .field("width", &self.width)
            .field("crs", &self.crs)
            .finish_non_exhaustive()
    }
}

impl AffineTransform {
    /// Create an affine transform for a `height × width` raster.
    ///
    /// `crs` is the raster's native CRS. `None` means the affine output is
    /// already the coordinate space callers work in (no reprojection).
    pub fn new(
        coefficients: [f64; 6],
        crs: Option<Crs>,
        height: usize,
        width: usize,
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(RouteError::input(format!(
                "raster must not be empty, got {height}x{width}"
            )));
        }
        let inverse = invert_affine(&coefficients)?;

        let (to_wgs84, from_wgs84) = match &crs {
            Some(native) if !native.is_wgs84() => {
                let wgs84 = Crs::wgs84();
                (
                    Some(CrsTransformer::new(native, &wgs84)?),
                    Some(CrsTransformer::new(&wgs84, native)?),
                )
            }
            _ => (None, None),
        };

        Ok(Self {
            coefficients,
            inverse,
            height,
            width,
            crs,
            to_wgs84,
            from_wgs84,
        })
    }

    /// Identity georeference: pixel (r, c) centers sit at (c + 0.5, r + 0.5).
    ///
    /// Used for plain images that carry no georeferencing.
    pub fn pixel_space(height: usize, width: usize) -> Result<Self> {
        Self::new([0.0, 1.0, 0.0, 0.0, 0.0, 1.0], None, height, width)
    }

    /// Affine coefficients in GDAL order.
    pub fn coefficients(&self) -> &[f64; 6] {
        &self.coefficients
    }

    /// Native CRS of the raster.
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Native coordinates of a pixel center.
    pub fn pixel_to_native(&self, p: PixelCoord) -> (f64, f64) {
        let [c, a, b, f, d, e] = self.coefficients;
        let col = p.col as f64 + 0.5;
        let row = p.row as f64 + 0.5;
        (c + col * a + row * b, f + col * d + row * e)
    }

    /// Fractional (row, col) of a native coordinate.
    pub fn native_to_fractional(&self, x: f64, y: f64) -> (f64, f64) {
        let [c, a, b, f, d, e] = self.inverse;
        let col = c + x * a + y * b;
        let row = f + x * d + y * e;
        (row, col)
    }

    /// Map a pixel center to WGS84.
    pub fn pixel_to_geo(&self, p: PixelCoord) -> Result<GeoPoint> {
        let (x, y) = self.pixel_to_native(p);
        let (lon, lat) = match &self.to_wgs84 {
            Some(t) => t.transform(x, y)?,
            None => (x, y),
        };
        Ok(GeoPoint::new(lon, lat))
    }

    /// Map a WGS84 point to the pixel containing it, `None` when outside the raster.
    pub fn geo_to_pixel_checked(&self, g: GeoPoint) -> Result<Option<PixelCoord>> {
        let (row, col) = self.geo_to_fractional(g)?;
        if row < 0.0 || col < 0.0 {
            return Ok(None);
        }
        let (row, col) = (row.floor() as usize, col.floor() as usize);
        Ok((row < self.height && col < self.width).then_some(PixelCoord::new(row, col)))
    }

    /// Map a WGS84 point to a pixel, clamped into the raster.
    pub fn geo_to_pixel(&self, g: GeoPoint) -> Result<PixelCoord> {
        let (row, col) = self.geo_to_fractional(g)?;
        Ok(PixelCoord::new(
            clamp_index(row, self.height),
            clamp_index(col, self.width),
        ))
    }

    fn geo_to_fractional(&self, g: GeoPoint) -> Result<(f64, f64)> {
        let (x, y) = match &self.from_wgs84 {
            Some(t) => t.transform(g.lon, g.lat)?,
            None => (g.lon, g.lat),
        };
        let (row, col) = self.native_to_fractional(x, y);
        trace!(
            "[Transform] ({:.6}, {:.6}) -> native ({:.3}, {:.3}) -> fractional ({:.3}, {:.3})",
            g.lon,
            g.lat,
            x,
            y,
            row,
            col
        );
        Ok((row, col))
    }
}

/// Invert a GDAL-ordered affine.
fn invert_affine(t: &[f64; 6]) -> Result<[f64; 6]> {
    let [c, a, b, f, d, e] = *t;
    let det = a * e - b * d;
    if !det.is_finite() || det == 0.0 {
        return Err(RouteError::computation(format!(
            "affine transform {t:?} is not invertible"
        )));
    }
    let ia = e / det;
    let ib = -b / det;
    let id = -d / det;
    let ie = a / det;
    let ic = -(ia * c + ib * f);
    let if_ = -(id * c + ie * f);
    Ok([ic, ia, ib, if_, id, ie])
}

/// Transform binding a navigability grid to geographic coordinates.
#[derive(Debug)]
pub enum CoordinateTransform {
    /// Bounding box stretched over the grid.
    Linear(LinearTransform),
    /// Raster georeference.
    Affine(AffineTransform),
}

impl CoordinateTransform {
    /// Grid dimensions (height, width) this transform covers.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            CoordinateTransform::Linear(t) => (t.height, t.width),
            CoordinateTransform::Affine(t) => (t.height, t.width),
        }
    }

    /// Map a cell to its geographic coordinate.
    pub fn pixel_to_geo(&self, p: PixelCoord) -> Result<GeoPoint> {
        match self {
            CoordinateTransform::Linear(t) => Ok(t.pixel_to_geo(p)),
            CoordinateTransform::Affine(t) => t.pixel_to_geo(p),
        }
    }

    /// Map a geographic point to a cell, clamped to the grid.
    pub fn geo_to_pixel(&self, g: GeoPoint) -> Result<PixelCoord> {
        match self {
            CoordinateTransform::Linear(t) => Ok(t.geo_to_pixel(g)),
            CoordinateTransform::Affine(t) => t.geo_to_pixel(g),
        }
    }

    /// Cell for a request endpoint.
    ///
    /// The linear variant clamps, so it always yields a cell; the affine
    /// variant yields `None` for points outside the raster.
    pub fn locate(&self, g: GeoPoint) -> Result<Option<PixelCoord>> {
        match self {
            CoordinateTransform::Linear(t) => Ok(Some(t.geo_to_pixel(g))),
            CoordinateTransform::Affine(t) => t.geo_to_pixel_checked(g),
        }
    }
}

impl From<LinearTransform> for CoordinateTransform {
    fn from(t: LinearTransform) -> Self {
        CoordinateTransform::Linear(t)
    }
}

impl From<AffineTransform> for CoordinateTransform {
    fn from(t: AffineTransform) -> Self {
        CoordinateTransform::Affine(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn test_linspace() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_linear_corners() {
        let t = LinearTransform::new(unit_box(), 200, 200).unwrap();
        assert_eq!(t.geo_to_pixel(GeoPoint::new(0.0, 0.0)), PixelCoord::new(0, 0));
        assert_eq!(
            t.geo_to_pixel(GeoPoint::new(10.0, 10.0)),
            PixelCoord::new(199, 199)
        );
        let g = t.pixel_to_geo(PixelCoord::new(199, 0));
        assert_relative_eq!(g.lon, 0.0);
        assert_relative_eq!(g.lat, 10.0);
    }

    #[test]
    fn test_linear_clamps_outside_points() {
        let t = LinearTransform::new(unit_box(), 50, 100).unwrap();
        assert_eq!(
            t.geo_to_pixel(GeoPoint::new(-5.0, 25.0)),
            PixelCoord::new(49, 0)
        );
        assert_eq!(
            t.geo_to_pixel(GeoPoint::new(f64::NAN, -1.0)),
            PixelCoord::new(0, 0)
        );
    }

    #[test]
    fn test_linear_truncates_toward_lower_cell() {
        let t = LinearTransform::new(unit_box(), 11, 11).unwrap();
        // 0.5 units per half cell: 4.99 still belongs to column 4
        assert_eq!(t.geo_to_pixel(GeoPoint::new(4.99, 0.0)).col, 4);
        assert_eq!(t.geo_to_pixel(GeoPoint::new(5.0, 0.0)).col, 5);
    }

    #[test]
    fn test_linear_roundtrip_within_one_cell() {
        let t = LinearTransform::new(
            BoundingBox::new(-73.2, 58.1, -51.7, 71.9).unwrap(),
            37,
            53,
        )
        .unwrap();
        for row in 0..37 {
            for col in 0..53 {
                let p = PixelCoord::new(row, col);
                let back = t.geo_to_pixel(t.pixel_to_geo(p));
                assert!(
                    back == p || back.is_adjacent(&p),
                    "{p:?} came back as {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_linear_rejects_tiny_grid() {
        assert!(LinearTransform::new(unit_box(), 1, 10).is_err());
    }

    #[test]
    fn test_affine_north_up_roundtrip() {
        // 0.1 degree pixels, origin at (-60, 75), rows growing south
        let t = AffineTransform::new(
            [-60.0, 0.1, 0.0, 75.0, 0.0, -0.1],
            Some(Crs::wgs84()),
            40,
            80,
        )
        .unwrap();

        let g = t.pixel_to_geo(PixelCoord::new(0, 0)).unwrap();
        assert_relative_eq!(g.lon, -59.95, epsilon = 1e-9);
        assert_relative_eq!(g.lat, 74.95, epsilon = 1e-9);

        for (row, col) in [(0, 0), (13, 27), (39, 79)] {
            let p = PixelCoord::new(row, col);
            let back = t.geo_to_pixel(t.pixel_to_geo(p).unwrap()).unwrap();
            assert_eq!(back, p);
        }

        assert_eq!(
            t.geo_to_pixel_checked(GeoPoint::new(-70.0, 70.0)).unwrap(),
            None
        );
        assert_eq!(
            t.geo_to_pixel(GeoPoint::new(-70.0, 70.0)).unwrap(),
            PixelCoord::new(39, 0)
        );
    }

    #[test]
    fn test_affine_rotated_roundtrip() {
        let t = AffineTransform::new([100.0, 2.0, 0.5, 300.0, -0.25, -3.0], None, 20, 20).unwrap();
        for (row, col) in [(0, 0), (5, 17), (19, 19), (11, 2)] {
            let p = PixelCoord::new(row, col);
            assert_eq!(t.geo_to_pixel(t.pixel_to_geo(p).unwrap()).unwrap(), p);
        }
    }

    #[test]
    fn test_affine_projected_roundtrip() {
        // 25 km polar stereographic cells around the north pole
        let crs = Crs::from_epsg(3413).unwrap();
        let t = AffineTransform::new(
            [-1_000_000.0, 25_000.0, 0.0, 1_000_000.0, 0.0, -25_000.0],
            Some(crs),
            80,
            80,
        )
        .unwrap();
        for (row, col) in [(0, 0), (40, 40), (79, 3), (12, 66)] {
            let p = PixelCoord::new(row, col);
            let g = t.pixel_to_geo(p).unwrap();
            assert!(g.lat > 70.0, "expected high Arctic latitude, got {g:?}");
            let back = t.geo_to_pixel(g).unwrap();
            assert!(back == p || back.is_adjacent(&p));
        }
    }

    #[test]
    fn test_singular_affine_rejected() {
        let err = AffineTransform::new([0.0, 1.0, 2.0, 0.0, 2.0, 4.0], None, 4, 4).unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_dimensions() {
        let linear: CoordinateTransform = LinearTransform::new(unit_box(), 30, 20).unwrap().into();
        assert_eq!(linear.dimensions(), (30, 20));
        let affine: CoordinateTransform = AffineTransform::pixel_space(7, 9).unwrap().into();
        assert_eq!(affine.dimensions(), (7, 9));
    }

    #[test]
    fn test_locate() {
        let linear: CoordinateTransform = LinearTransform::new(unit_box(), 10, 10).unwrap().into();
        assert_eq!(
            linear.locate(GeoPoint::new(50.0, 50.0)).unwrap(),
            Some(PixelCoord::new(9, 9))
        );
        let affine: CoordinateTransform = AffineTransform::pixel_space(7, 9).unwrap().into();
        assert_eq!(
            affine.locate(GeoPoint::new(8.5, 6.5)).unwrap(),
            Some(PixelCoord::new(6, 8))
        );
        assert_eq!(affine.locate(GeoPoint::new(9.5, 1.0)).unwrap(), None);
    }
}
