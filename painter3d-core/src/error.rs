/// Error types for the rendering pipeline
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Degenerate camera: eye ({x}, {y}, {z}) coincides with the target")]
    DegenerateCamera { x: f32, y: f32, z: f32 },
    #[error("Invalid projection parameters: {0}")]
    InvalidProjection(String),
    #[error("No color style named '{0}'")]
    StyleLookup(String),
    #[error("Invalid resolution {0}: must be at least 1")]
    InvalidResolution(usize),
    #[error("{kind} {element} references vertex {index}, but the mesh has {len} vertices")]
    IndexOutOfRange {
        kind: &'static str,
        element: usize,
        index: usize,
        len: usize,
    },
    #[error("Mesh has {faces} faces but {colors} colors")]
    ColorCountMismatch { faces: usize, colors: usize },
    #[error("Invalid solid parameters: {0}")]
    InvalidSolid(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
