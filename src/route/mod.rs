//! Route assembly and request planning.

mod assembler;
mod planner;
mod request;

pub use assembler::{
    AssemblerConfig, ProvenancePolicy, Route, RouteAssembler, RouteMethod, interpolate,
};
pub use planner::{RoutePlanner, SearchLimits};
pub use request::{RoutePlan, RouteRequest};
