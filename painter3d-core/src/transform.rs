/// Homogeneous 4x4 transformation matrices and their application to points
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Transform builder for 3D transformations
///
/// Matrices compose right-to-left: in `a * b` the matrix `b` acts on the
/// vertex first. Rotation angles are in degrees.
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Rotation about the world X axis
    pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::x() * degrees.to_radians())
    }

    /// Rotation about the world Y axis
    pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::y() * degrees.to_radians())
    }

    /// Rotation about the world Z axis
    pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::z() * degrees.to_radians())
    }

    /// Create a scale matrix
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Multiply matrices in the given order; the last one acts first.
    pub fn compose(matrices: &[Matrix4<f32>]) -> Matrix4<f32> {
        matrices
            .iter()
            .fold(Matrix4::identity(), |acc, matrix| acc * matrix)
    }

    /// Transform a single point (homogeneous weight 1).
    ///
    /// The result is divided by the output weight unless that weight is 1
    /// (affine) or 0 (point at infinity, returned undivided). Use
    /// [`Transform::to_clip`] when the weight itself matters.
    pub fn apply_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
        let h = matrix * point.to_homogeneous();
        if h.w == 1.0 || h.w == 0.0 {
            Point3::new(h.x, h.y, h.z)
        } else {
            Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        }
    }

    /// Transform a batch of points; the output has the same length and order.
    pub fn apply_points(matrix: &Matrix4<f32>, points: &[Point3<f32>]) -> Vec<Point3<f32>> {
        points
            .iter()
            .map(|point| Self::apply_point(matrix, point))
            .collect()
    }

    /// Transform a direction (homogeneous weight 0), ignoring translation.
    pub fn apply_vector(matrix: &Matrix4<f32>, vector: &Vector3<f32>) -> Vector3<f32> {
        let h = matrix * vector.to_homogeneous();
        Vector3::new(h.x, h.y, h.z)
    }

    /// Raw homogeneous result of transforming a point, without the divide.
    pub fn to_clip(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Vector4<f32> {
        matrix * point.to_homogeneous()
    }
}
