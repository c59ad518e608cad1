//! Error types for depth derivation

use std::fmt;

/// Errors that can occur while deriving paragraph depths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthError {
    /// A marker string that belongs to no known alphabet. The caller
    /// decides whether to drop it or treat it as markerless; the engine
    /// will not guess.
    AmbiguousMarker { marker: String, position: usize },
    /// No type/depth assignment satisfies the constraints. Recoverable:
    /// callers flatten the offending section instead of aborting the
    /// document build.
    Infeasible { markers: Vec<String> },
    /// A solution violated an internal invariant
    MalformedSolution { detail: String },
}

impl fmt::Display for DepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthError::AmbiguousMarker { marker, position } => {
                write!(
                    f,
                    "Marker {:?} at position {} matches no known alphabet",
                    marker, position
                )
            }
            DepthError::Infeasible { markers } => {
                write!(
                    f,
                    "Could not determine paragraph depths for markers {:?}",
                    markers
                )
            }
            DepthError::MalformedSolution { detail } => {
                write!(f, "Malformed solution: {}", detail)
            }
        }
    }
}

impl std::error::Error for DepthError {}

/// Type alias for results of depth derivation
pub type DepthResult<T> = Result<T, DepthError>;
