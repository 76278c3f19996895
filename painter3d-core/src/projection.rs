/// Perspective projection and clip-space utilities
use nalgebra::{Matrix4, Point3, Vector4};

use crate::error::{RenderError, Result};

/// Parameters of a right-handed perspective frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    /// Validate and store frustum parameters
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        let projection = Self {
            fov_y_degrees,
            aspect,
            near,
            far,
        };
        projection.validate()?;
        Ok(projection)
    }

    /// Check `0 < near < far`, `0 < fov < 180` and a positive finite aspect.
    pub fn validate(&self) -> Result<()> {
        // Written as negations so NaN fails every check
        if !(self.near > 0.0 && self.near.is_finite()) {
            return Err(RenderError::InvalidProjection(format!(
                "near plane must be positive, got {}",
                self.near
            )));
        }
        if !(self.far > self.near && self.far.is_finite()) {
            return Err(RenderError::InvalidProjection(format!(
                "far plane ({}) must be greater than near plane ({})",
                self.far, self.near
            )));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(RenderError::InvalidProjection(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(RenderError::InvalidProjection(format!(
                "aspect ratio must be positive, got {}",
                self.aspect
            )));
        }
        Ok(())
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Result<Matrix4<f32>> {
        perspective(self.fov_y_degrees, self.aspect, self.near, self.far)
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 1.0,
            near: 1.0,
            far: 50.0,
        }
    }
}

/// Standard right-handed perspective matrix mapping camera space to clip space.
///
/// Camera-space depths `-near` and `-far` land on NDC z of -1 and +1.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Matrix4<f32>> {
    Perspective {
        fov_y_degrees,
        aspect,
        near,
        far,
    }
    .validate()?;

    let f = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
    let depth = near - far;

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        f / aspect, 0.0, 0.0,                 0.0,
        0.0,        f,   0.0,                 0.0,
        0.0,        0.0, (far + near) / depth, 2.0 * far * near / depth,
        0.0,        0.0, -1.0,                0.0,
    );
    Ok(matrix)
}

/// Combine projection and view into one world-to-clip transform
pub fn view_projection(projection: &Matrix4<f32>, view: &Matrix4<f32>) -> Matrix4<f32> {
    projection * view
}

/// Perspective divide.
///
/// Returns `None` for points at or behind the eye (`w <= 0`), which would
/// otherwise be mirrored through the origin, and for non-finite results.
pub fn clip_to_ndc(clip: &Vector4<f32>) -> Option<Point3<f32>> {
    if !(clip.w > 0.0) {
        return None;
    }
    let ndc = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
    ndc.coords.iter().all(|c| c.is_finite()).then_some(ndc)
}
