//! Dense navigability grid storage.
//!
//! The grid is a flat row-major `Vec<u8>`: index = `row * width + col`.
//! A value of [`NavigabilityGrid::TRAVERSABLE`] marks a passable cell, anything
//! else is an obstacle. Dimensions are fixed at construction.

use crate::core::PixelCoord;
use crate::error::{Result, RouteError};

use super::transform::CoordinateTransform;

/// Binary occupancy grid paired with the transform that produced it.
#[derive(Debug)]
pub struct NavigabilityGrid {
    cells: Vec<u8>,
    height: usize,
    width: usize,
    transform: CoordinateTransform,
}

impl NavigabilityGrid {
    /// Cell value for a passable cell.
    pub const TRAVERSABLE: u8 = 1;

    /// Cell value for an obstacle.
    pub const OBSTACLE: u8 = 0;

    /// Create a grid of obstacles sized to the transform.
    pub fn blocked(transform: CoordinateTransform) -> Self {
        let (height, width) = transform.dimensions();
        Self {
            cells: vec![Self::OBSTACLE; height * width],
            height,
            width,
            transform,
        }
    }

    /// Create a grid from an existing row-major buffer.
    ///
    /// The buffer length must match the transform dimensions and every value
    /// must be 0 or 1.
    pub fn from_cells(cells: Vec<u8>, transform: CoordinateTransform) -> Result<Self> {
        let (height, width) = transform.dimensions();
        if cells.len() != height * width {
            return Err(RouteError::computation(format!(
                "grid buffer holds {} cells but transform covers {}x{}",
                cells.len(),
                height,
                width
            )));
        }
        if let Some(bad) = cells.iter().find(|&&v| v > Self::TRAVERSABLE) {
            return Err(RouteError::computation(format!(
                "grid buffer contains non-binary value {bad}"
            )));
        }
        Ok(Self {
            cells,
            height,
            width,
            transform,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The coordinate transform bound to this grid.
    #[inline]
    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Raw row-major cells.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Check whether a coordinate lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, p: PixelCoord) -> bool {
        p.row < self.height && p.col < self.width
    }

    #[inline]
    fn index(&self, p: PixelCoord) -> usize {
        p.row * self.width + p.col
    }

    /// Cell value, `None` when out of bounds.
    #[inline]
    pub fn get(&self, p: PixelCoord) -> Option<u8> {
        self.in_bounds(p).then(|| self.cells[self.index(p)])
    }

    /// True when the cell is inside the grid and traversable.
    #[inline]
    pub fn is_traversable(&self, p: PixelCoord) -> bool {
        self.get(p) == Some(Self::TRAVERSABLE)
    }

    /// Mark a cell traversable or blocked. Out-of-bounds writes are ignored.
    #[inline]
    pub(crate) fn set_traversable(&mut self, p: PixelCoord, traversable: bool) {
        if self.in_bounds(p) {
            let idx = self.index(p);
            self.cells[idx] = if traversable {
                Self::TRAVERSABLE
            } else {
                Self::OBSTACLE
            };
        }
    }

    /// Block every traversable cell for which `keep` returns false.
    ///
    /// `keep` sees each cell with the grid transform. Returns the number of
    /// cells that were blocked.
    pub fn retain_traversable<F>(&mut self, mut keep: F) -> Result<usize>
    where
        F: FnMut(PixelCoord, &CoordinateTransform) -> Result<bool>,
    {
        let transform = &self.transform;
        let mut blocked = 0;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            let p = PixelCoord::new(idx / self.width, idx % self.width);
            if *cell == Self::TRAVERSABLE && !keep(p, transform)? {
                *cell = Self::OBSTACLE;
                blocked += 1;
            }
        }
        Ok(blocked)
    }

    /// Count of traversable cells.
    pub fn traversable_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&v| v == Self::TRAVERSABLE)
            .count()
    }

    /// ASCII rendering for debugging (`.` traversable, `#` obstacle), first row on top.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(if self.is_traversable(PixelCoord::new(row, col)) {
                    '.'
                } else {
                    '#'
                });
            }
            out.push('\n');
        }
        out
    }
}
