//! Request and response shapes at the routing boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::GeoPoint;
use crate::error::{Result, RouteError};
use crate::io::{Feature, FeatureCollection, Geometry};

use super::assembler::Route;

/// A routing request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Start `[lon, lat]`.
    pub start: [f64; 2],
    /// End `[lon, lat]`.
    pub end: [f64; 2],
    /// Features the grid is built from.
    pub geojson: FeatureCollection,
    /// Check the route against the configured corridor.
    #[serde(default)]
    pub use_corridor: bool,
}

impl RouteRequest {
    /// Parse a request from JSON. Missing fields are input errors.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Reject non-finite endpoints.
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("start", self.start), ("end", self.end)] {
            if !p[0].is_finite() || !p[1].is_finite() {
                return Err(RouteError::input(format!("{name} has non-finite coordinates")));
            }
        }
        Ok(())
    }

    /// Start point.
    pub fn start_point(&self) -> GeoPoint {
        self.start.into()
    }

    /// End point.
    pub fn end_point(&self) -> GeoPoint {
        self.end.into()
    }
}

/// A route together with its corridor check.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    pub route: Route,
    /// Route points outside the corridor, when a corridor check ran.
    pub corridor_points_outside: Option<usize>,
}

impl RoutePlan {
    /// Response body: one LineString feature tagged with the route method.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut properties = Map::new();
        properties.insert("method".into(), Value::from(self.route.method.as_str()));
        if let Some(outside) = self.corridor_points_outside {
            properties.insert("corridor_points_outside".into(), Value::from(outside));
        }
        FeatureCollection::new(vec![Feature::new(
            Geometry::line_string(&self.route.points),
            properties,
        )])
    }

    /// Response body as a JSON value.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.to_feature_collection())?)
    }
}
