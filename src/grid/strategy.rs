//! Common capability of the grid builders.

use crate::error::Result;

use super::NavigabilityGrid;

/// Builds a navigability grid from one kind of input.
///
/// Implementations validate their input and fail with an input error
/// before allocating any grid storage.
pub trait NavigabilityStrategy {
    /// What the strategy consumes.
    type Input: ?Sized;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Build the grid and its transform.
    fn build(&self, input: &Self::Input) -> Result<NavigabilityGrid>;
}
