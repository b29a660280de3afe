use serde::{Deserialize, Serialize};
use std::fmt;

/// Incoming-flux rule applied at one edge of the lattice domain.
///
/// Each of the four domain edges carries its own condition. Periodic edges
/// must come in opposite pairs (x-min with x-max, y-min with y-max); the
/// solver validates this before linking track ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Outgoing angular flux re-enters along the mirrored direction.
    #[default]
    Reflective,
    /// Nothing re-enters; outgoing flux is lost.
    Vacuum,
    /// Outgoing flux re-enters at the same coordinate on the opposite edge.
    Periodic,
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Reflective => write!(f, "reflective"),
            BoundaryCondition::Vacuum => write!(f, "vacuum"),
            BoundaryCondition::Periodic => write!(f, "periodic"),
        }
    }
}
