use std::io;

use thiserror::Error;

/// Everything that can go wrong while building a scene, a camera, or writing
/// the final image.
///
/// Rendering itself never fails: once a `Camera` has been built and handed a
/// tracer and a writer, every pixel computation is total.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a vector cannot have zero length")]
    ZeroVector,

    #[error("two of the points are identical")]
    DuplicatePoints,

    #[error("all the points are on one line")]
    CollinearPoints,

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("all vertices of a polygon must lie in the same plane")]
    NonCoplanar,

    #[error("polygon vertices must be ordered and the polygon must be convex")]
    NonConvex,

    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("height must be positive, got {0}")]
    InvalidHeight(f64),

    #[error("camera direction vectors are not orthogonal")]
    NotOrthogonal,

    #[error("view plane distance cannot be zero")]
    ZeroDistance,

    #[error("missing {0}")]
    MissingResource(&'static str),

    #[error("invalid scene description: {0}")]
    Scene(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
