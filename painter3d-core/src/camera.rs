/// Camera placement and the look-at view matrix
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{RenderError, Result};
use crate::transform::Transform;

/// Lengths below this are treated as zero when building the camera basis.
const BASIS_EPSILON: f32 = 1e-6;

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        Self { eye, target, up }
    }

    /// Create the view matrix (world to camera space)
    pub fn view_matrix(&self) -> Result<Matrix4<f32>> {
        look_at(&self.eye, &self.target, &self.up)
    }

    /// Unit direction the camera looks along, from eye to target
    pub fn forward(&self) -> Option<Vector3<f32>> {
        (self.target - self.eye).try_normalize(BASIS_EPSILON)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }
}

/// Build a world-to-camera matrix with the look-at construction.
///
/// The camera sits at the origin of camera space looking down -Z, with +Y as
/// its up direction. `world_up` does not need to be unit length. When it is
/// parallel to the viewing direction the right axis falls back to world X
/// (or world Y if X is parallel too); the roll of the result is then
/// arbitrary but the matrix is still orthonormal.
pub fn look_at(
    eye: &Point3<f32>,
    target: &Point3<f32>,
    world_up: &Vector3<f32>,
) -> Result<Matrix4<f32>> {
    let forward = (eye - target)
        .try_normalize(BASIS_EPSILON)
        .ok_or(RenderError::DegenerateCamera {
            x: eye.x,
            y: eye.y,
            z: eye.z,
        })?;

    let up = world_up.try_normalize(BASIS_EPSILON).unwrap_or_else(Vector3::zeros);
    let right = match up.cross(&forward).try_normalize(BASIS_EPSILON) {
        Some(right) => right,
        None => {
            warn!(
                "Camera up {:?} is parallel to the view direction, using a fallback right axis",
                world_up
            );
            fallback_right(&forward)
        }
    };
    let camera_up = forward.cross(&right);

    #[rustfmt::skip]
    let rotation = Matrix4::new(
        right.x,     right.y,     right.z,     0.0,
        camera_up.x, camera_up.y, camera_up.z, 0.0,
        forward.x,   forward.y,   forward.z,   0.0,
        0.0,         0.0,         0.0,         1.0,
    );

    Ok(rotation * Transform::translation(-eye.x, -eye.y, -eye.z))
}

/// World X made orthogonal to `forward`, or world Y if X is parallel to it.
fn fallback_right(forward: &Vector3<f32>) -> Vector3<f32> {
    [Vector3::x(), Vector3::y()]
        .iter()
        .find_map(|axis| (axis - forward * axis.dot(forward)).try_normalize(BASIS_EPSILON))
        .unwrap_or_else(Vector3::x)
}
