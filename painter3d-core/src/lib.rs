/// painter3d Core Library - Painter's algorithm rendering pipeline
///
/// This library provides the stateless core of the renderer: scene geometry,
/// camera and perspective matrices, depth ordering and scanline rasterization
/// into square framebuffers, plus the solid generators and STL import that
/// populate a scene.

pub mod camera;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod solids;
pub mod stl;
pub mod transform;
pub mod visibility;

// Re-export commonly used types
pub use camera::{look_at, Camera};
pub use color::{Palette, Rgb};
pub use error::{RenderError, Result};
pub use framebuffer::Framebuffer;
pub use geometry::{Edge, Face, Mesh, Scene};
pub use pipeline::{prepare, render, PreparedFrame, RenderSettings};
pub use projection::{clip_to_ndc, perspective, view_projection, Perspective};
pub use raster::{rasterize, rasterize_resolutions};
pub use stl::{parse_stl, StlError};
pub use transform::Transform;
pub use visibility::{order_faces, Renderable};
