//! R-tree over corridor parts in the working CRS.

use geo::{BoundingRect, EuclideanDistance, Geometry, LineString, Point, Polygon};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::error::{Result, RouteError};

/// One simple piece of a corridor geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum CorridorPart {
    Line(LineString<f64>),
    Area(Polygon<f64>),
    Spot(Point<f64>),
}

impl CorridorPart {
    /// Planar distance from a point. Points inside an area are at distance 0.
    pub fn distance_to(&self, p: &Point<f64>) -> f64 {
        match self {
            CorridorPart::Line(l) => p.euclidean_distance(l),
            CorridorPart::Area(a) => p.euclidean_distance(a),
            CorridorPart::Spot(s) => p.euclidean_distance(s),
        }
    }

    /// Split a geometry into simple parts.
    pub fn split(geometry: Geometry<f64>, out: &mut Vec<CorridorPart>) {
        match geometry {
            Geometry::Point(p) => out.push(CorridorPart::Spot(p)),
            Geometry::MultiPoint(mp) => out.extend(mp.0.into_iter().map(CorridorPart::Spot)),
            Geometry::Line(l) => out.push(CorridorPart::Line(LineString::from(l))),
            Geometry::LineString(l) => out.push(CorridorPart::Line(l)),
            Geometry::MultiLineString(ml) => out.extend(ml.0.into_iter().map(CorridorPart::Line)),
            Geometry::Polygon(p) => out.push(CorridorPart::Area(p)),
            Geometry::MultiPolygon(mp) => out.extend(mp.0.into_iter().map(CorridorPart::Area)),
            Geometry::Rect(r) => out.push(CorridorPart::Area(r.to_polygon())),
            Geometry::Triangle(t) => out.push(CorridorPart::Area(t.to_polygon())),
            Geometry::GeometryCollection(gc) => {
                for g in gc.0 {
                    Self::split(g, out);
                }
            }
        }
    }
}

/// A corridor part for R-tree storage.
#[derive(Clone, Debug)]
pub struct IndexedPart {
    /// The part geometry.
    pub part: CorridorPart,
    /// Index of the source feature.
    pub feature: usize,
    envelope: AABB<[f64; 2]>,
}

impl IndexedPart {
    /// Create a new indexed part. Fails for empty geometry.
    pub fn new(part: CorridorPart, feature: usize) -> Result<Self> {
        let rect = match &part {
            CorridorPart::Line(l) => l.bounding_rect(),
            CorridorPart::Area(a) => a.bounding_rect(),
            CorridorPart::Spot(s) => Some(s.bounding_rect()),
        }
        .ok_or_else(|| RouteError::input(format!("corridor feature {feature} is empty")))?;

        Ok(Self {
            part,
            feature,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

impl RTreeObject for IndexedPart {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedPart {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dist = self.part.distance_to(&Point::new(point[0], point[1]));
        dist * dist // Squared distance
    }
}

/// Spatial index over corridor parts.
#[derive(Clone, Debug)]
pub struct PartIndex {
    tree: RTree<IndexedPart>,
}

impl PartIndex {
    /// Bulk-load an index.
    pub fn new(parts: Vec<IndexedPart>) -> Self {
        Self {
            tree: RTree::bulk_load(parts),
        }
    }

    /// Number of parts in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// True when some part lies within `distance` of the point (inclusive).
    pub fn any_within(&self, x: f64, y: f64, distance: f64) -> bool {
        self.tree
            .locate_within_distance([x, y], distance * distance)
            .next()
            .is_some()
    }

    /// Nearest part and its distance.
    pub fn nearest(&self, x: f64, y: f64) -> Option<(&IndexedPart, f64)> {
        let p = Point::new(x, y);
        self.tree
            .nearest_neighbor(&[x, y])
            .map(|indexed| (indexed, indexed.part.distance_to(&p)))
    }
}
