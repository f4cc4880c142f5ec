//! Error types for body construction and configuration.
//!
//! Stepping never fails; every fallible operation happens when a body or a
//! world is created.

use thiserror::Error;

/// Construction-time contract failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("density must be positive and finite, got {0}")]
    InvalidDensity(f64),
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("box half extents must be positive and finite, got ({0}, {1})")]
    InvalidExtents(f64, f64),
    #[error("polygon needs between {min} and {max} vertices, got {count}")]
    VertexCount { count: usize, min: usize, max: usize },
    #[error("polygon has zero area or coincident vertices")]
    DegeneratePolygon,
    #[error("polygon is not convex")]
    NonConvexPolygon,
    #[error("no material named `{0}`")]
    UnknownMaterial(String),
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
}

/// Convenient Result alias for crate operations.
pub type Result<T> = std::result::Result<T, PhysicsError>;
