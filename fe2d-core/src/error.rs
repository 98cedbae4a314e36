//! Error types for fe2d operations.

use thiserror::Error;

/// Result type alias using the fe2d Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in element kernels, refinement and boundary conditions.
///
/// Every variant signals a caller or model error. None of them is transient, so
/// nothing in the crate retries or substitutes a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unrecognized physics mode, unsupported quadrature rule, malformed
    /// boundary condition, or an operation not available for a mode.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Degenerate or inverted element geometry.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A line, cell or node referenced by the caller does not exist in the mesh.
    #[error("topology error: {0}")]
    Topology(String),

    /// Output tag not defined for the current physics mode.
    #[error("output request error: {0}")]
    OutputRequest(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),
}
