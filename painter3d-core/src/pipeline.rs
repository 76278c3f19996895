/// End-to-end rendering: view, projection, ordering and rasterization
use log::{debug, info};
use nalgebra::Matrix4;

use crate::camera::Camera;
use crate::color::Palette;
use crate::error::{RenderError, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Scene;
use crate::projection::{view_projection, Perspective};
use crate::raster::rasterize_resolutions;
use crate::visibility::{order_faces, Renderable};

/// Projection and styling shared by every resolution of one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Color of overlay line segments
    pub line_color: Palette,
}

impl RenderSettings {
    /// Square framebuffers, so the aspect ratio is always 1
    pub fn perspective(&self) -> Perspective {
        Perspective {
            fov_y_degrees: self.fov_y_degrees,
            aspect: 1.0,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 1.0,
            far: 50.0,
            line_color: Palette::Red,
        }
    }
}

/// A frame prepared for rasterization: matrices computed and faces ordered
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    pub view: Matrix4<f32>,
    pub transform: Matrix4<f32>,
    pub ordered: Vec<Renderable>,
}

/// Validate parameters, build the matrices and depth-sort the scene.
///
/// Projection parameters are checked before any transform work.
pub fn prepare(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> Result<PreparedFrame> {
    let projection = settings.perspective().matrix()?;
    let view = camera.view_matrix()?;
    let transform = view_projection(&projection, &view);
    let ordered = order_faces(scene, &view, settings.near, settings.far);
    debug!(
        "Prepared frame: {} of {} faces visible, {} line segments",
        ordered.len(),
        scene.face_count(),
        scene.edge_count()
    );
    Ok(PreparedFrame {
        view,
        transform,
        ordered,
    })
}

/// Render the scene once per requested resolution.
///
/// Returns one framebuffer per entry of `resolutions`, in the same order.
/// Fails on a degenerate camera, invalid projection parameters or a zero
/// resolution; problems with individual faces or lines only skip them.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    resolutions: &[usize],
) -> Result<Vec<Framebuffer>> {
    if let Some(&bad) = resolutions.iter().find(|&&r| r == 0) {
        return Err(RenderError::InvalidResolution(bad));
    }

    let frame = prepare(scene, camera, settings)?;
    info!(
        "Rendering {} faces at resolutions {:?}",
        frame.ordered.len(),
        resolutions
    );
    Ok(rasterize_resolutions(
        &frame.ordered,
        &scene.lines,
        &frame.transform,
        resolutions,
        settings.line_color,
    ))
}
