//! GeoJSON wire types.
//!
//! Only the subset the planner consumes and produces: features with the
//! seven standard geometry types, optional properties, and the legacy
//! named `crs` member used by corridor files. Positions keep the first two
//! ordinates; altitude is dropped.

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::GeoPoint;
use crate::error::{Result, RouteError};
use crate::projection::Crs;

/// A GeoJSON position (x/longitude, y/latitude).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(v: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        if v.len() < 2 {
            return Err(format!(
                "position needs at least 2 ordinates, got {}",
                v.len()
            ));
        }
        if !v[0].is_finite() || !v[1].is_finite() {
            return Err(format!("position has non-finite ordinates: {v:?}"));
        }
        Ok(Self { x: v[0], y: v[1] })
    }
}

impl From<Position> for Vec<f64> {
    fn from(p: Position) -> Self {
        vec![p.x, p.y]
    }
}

impl From<GeoPoint> for Position {
    fn from(g: GeoPoint) -> Self {
        Self { x: g.lon, y: g.lat }
    }
}

impl From<Position> for Coord<f64> {
    fn from(p: Position) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

/// GeoJSON geometry object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

fn line(coords: &[Position]) -> LineString<f64> {
    LineString::new(coords.iter().map(|&p| p.into()).collect())
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| RouteError::input("polygon has no rings"))?;
    if exterior.len() < 3 {
        return Err(RouteError::input(format!(
            "polygon exterior ring needs at least 3 positions, got {}",
            exterior.len()
        )));
    }
    Ok(Polygon::new(
        line(exterior),
        interiors.iter().map(|r| line(r)).collect(),
    ))
}

impl Geometry {
    /// LineString geometry through a sequence of geographic points.
    pub fn line_string(points: &[GeoPoint]) -> Self {
        Geometry::LineString {
            coordinates: points.iter().map(|&g| g.into()).collect(),
        }
    }

    /// GeoJSON `type` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Convert to a `geo` geometry.
    ///
    /// Empty line strings and polygons without an exterior ring are rejected.
    pub fn to_geo(&self) -> Result<geo::Geometry<f64>> {
        let geometry = match self {
            Geometry::Point { coordinates } => {
                geo::Geometry::Point(Point::new(coordinates.x, coordinates.y))
            }
            Geometry::MultiPoint { coordinates } => {
                if coordinates.is_empty() {
                    return Err(RouteError::input("empty MultiPoint"));
                }
                geo::Geometry::MultiPoint(MultiPoint::new(
                    coordinates.iter().map(|p| Point::new(p.x, p.y)).collect(),
                ))
            }
            Geometry::LineString { coordinates } => {
                if coordinates.len() < 2 {
                    return Err(RouteError::input(format!(
                        "LineString needs at least 2 positions, got {}",
                        coordinates.len()
                    )));
                }
                geo::Geometry::LineString(line(coordinates))
            }
            Geometry::MultiLineString { coordinates } => {
                if coordinates.is_empty() || coordinates.iter().any(|l| l.len() < 2) {
                    return Err(RouteError::input(
                        "MultiLineString parts need at least 2 positions each",
                    ));
                }
                geo::Geometry::MultiLineString(MultiLineString::new(
                    coordinates.iter().map(|l| line(l)).collect(),
                ))
            }
            Geometry::Polygon { coordinates } => geo::Geometry::Polygon(polygon(coordinates)?),
            Geometry::MultiPolygon { coordinates } => {
                if coordinates.is_empty() {
                    return Err(RouteError::input("empty MultiPolygon"));
                }
                geo::Geometry::MultiPolygon(MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|rings| polygon(rings))
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
            Geometry::GeometryCollection { geometries } => {
                if geometries.is_empty() {
                    return Err(RouteError::input("empty GeometryCollection"));
                }
                geo::Geometry::GeometryCollection(geo::GeometryCollection(
                    geometries
                        .iter()
                        .map(Geometry::to_geo)
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
        };
        Ok(geometry)
    }
}

/// GeoJSON feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Feature {
    /// Feature with a geometry and properties.
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: Some(properties),
            id: None,
        }
    }
}

/// GeoJSON feature collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// Legacy named CRS member (`{"type": "name", "properties": {"name": ...}}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
}

impl FeatureCollection {
    /// Collection holding the given features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: None,
        }
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// CRS declared by the legacy `crs` member, if any.
    pub fn declared_crs(&self) -> Result<Option<Crs>> {
        let Some(crs) = &self.crs else {
            return Ok(None);
        };
        let name = crs
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| RouteError::input("crs member has no properties.name"))?;
        Ok(Some(name.parse()?))
    }

    /// Convert every feature geometry to `geo`, failing on missing or malformed geometry.
    pub fn geometries(&self) -> Result<Vec<geo::Geometry<f64>>> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, f)| {
                f.geometry
                    .as_ref()
                    .ok_or_else(|| RouteError::input(format!("feature {i} has no geometry")))?
                    .to_geo()
                    .map_err(|e| match e {
                        RouteError::Input(msg) => RouteError::Input(format!("feature {i}: {msg}")),
                        other => other,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 30.0]}, "properties": {"kind": "floe"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3.5, 4.5]}, "properties": null}
            ]
        }"#;
        let fc = FeatureCollection::from_json(json).unwrap();
        assert_eq!(fc.len(), 2);
        let geoms = fc.geometries().unwrap();
        assert_eq!(geoms[0], geo::Geometry::Point(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_polygon_to_geo() {
        let g = Geometry::Polygon {
            coordinates: vec![vec![
                Position::new(0.0, 0.0),
                Position::new(2.0, 0.0),
                Position::new(2.0, 2.0),
                Position::new(0.0, 0.0),
            ]],
        };
        match g.to_geo().unwrap() {
            geo::Geometry::Polygon(p) => assert_eq!(p.exterior().0.len(), 4),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_bad_position_is_input_error() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0]}, "properties": {}}
        ]}"#;
        let err = FeatureCollection::from_json(json).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_geometry_reported() {
        let fc = FeatureCollection::new(vec![Feature {
            geometry: None,
            properties: None,
            id: None,
        }]);
        let err = fc.geometries().unwrap_err();
        assert!(err.to_string().contains("feature 0"));
    }

    #[test]
    fn test_declared_crs() {
        let json = r#"{"type": "FeatureCollection", "features": [],
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3413"}}}"#;
        let fc = FeatureCollection::from_json(json).unwrap();
        assert_eq!(fc.declared_crs().unwrap().unwrap().epsg(), Some(3413));
        assert!(FeatureCollection::default().declared_crs().unwrap().is_none());
    }

    #[test]
    fn test_line_string_serializes_as_geojson() {
        let g = Geometry::line_string(&[GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]);
        let v = serde_json::to_value(&g).unwrap();
        assert_eq!(v["type"], "LineString");
        assert_eq!(v["coordinates"], serde_json::json!([[1.0, 2.0], [3.0, 4.0]]));
    }
}
