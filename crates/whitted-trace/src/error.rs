//! Error types for scene assembly.

use thiserror::Error;
use whitted_geom::GeomError;

/// Errors that can occur while building a scene or camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A shape had invalid parameters.
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeomError),

    /// Refractive indices must be positive.
    #[error("refractive index must be positive, got {0}")]
    InvalidRefractiveIndex(f64),

    /// An object of a scene document could not be built.
    #[error("object #{index}: {reason}")]
    Object {
        /// Position of the object in the document.
        index: usize,
        /// What was wrong with it.
        reason: Box<SceneError>,
    },

    /// Camera settings that cannot produce an image.
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
