/// Procedural solids: boxes, cylinders, pipes and lines
///
/// Every generator returns a white [`Mesh`] in its own local frame; place it
/// with [`Mesh::transformed`] and recolor it with [`Mesh::with_color`].
use std::f32::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::color::Palette;
use crate::error::{RenderError, Result};
use crate::geometry::{Edge, Face, Mesh};

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(RenderError::InvalidSolid(message()))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    ensure(value > 0.0 && value.is_finite(), || {
        format!("{} must be positive, got {}", name, value)
    })
}

/// Evenly spaced angles around a circle, excluding the closing 2π
fn ring_angles(divisions: usize) -> impl Iterator<Item = f32> {
    (0..divisions).map(move |i| TAU * i as f32 / divisions as f32)
}

/// Axis-aligned box with one corner at the origin.
///
/// Width runs along X, height along Y and depth along Z. Each side is two
/// triangles wound counter-clockwise seen from outside.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Mesh> {
    positive("width", width)?;
    positive("height", height)?;
    positive("depth", depth)?;

    //       6--------7
    //      /|       /|
    //     2--------3 |
    //     | 4------|-5
    //     |/       |/
    //     0--------1
    let vertices = vec![
        Point3::new(0.0, 0.0, depth),
        Point3::new(width, 0.0, depth),
        Point3::new(0.0, height, depth),
        Point3::new(width, height, depth),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(width, 0.0, 0.0),
        Point3::new(0.0, height, 0.0),
        Point3::new(width, height, 0.0),
    ];

    let quads = [
        [0, 1, 3, 2], // front
        [4, 5, 1, 0], // bottom
        [4, 6, 7, 5], // back
        [2, 3, 7, 6], // top
        [0, 2, 6, 4], // left
        [1, 5, 7, 3], // right
    ];
    let faces: Vec<Face> = quads
        .iter()
        .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
        .collect();

    let edges = vec![
        [0, 1], [0, 2], [0, 4], [1, 3], [1, 5], [2, 3],
        [2, 6], [3, 7], [4, 5], [4, 6], [5, 7], [6, 7],
    ];

    Mesh::uniform(vertices, faces, edges, Palette::White)
}

/// Closed cylinder standing on the XY plane with its axis along +Z
pub fn cylinder(radius: f32, height: f32, divisions: usize) -> Result<Mesh> {
    positive("radius", radius)?;
    positive("height", height)?;
    ensure(divisions >= 3, || format!("cylinder needs at least 3 divisions, got {}", divisions))?;

    const BASE_CENTER: usize = 0;
    const TOP_CENTER: usize = 1;
    let mut vertices = vec![Point3::origin(), Point3::new(0.0, 0.0, height)];
    for angle in ring_angles(divisions) {
        let (x, y) = (radius * angle.cos(), radius * angle.sin());
        vertices.push(Point3::new(x, y, 0.0));
        vertices.push(Point3::new(x, y, height));
    }

    let mut faces = Vec::with_capacity(divisions * 4);
    let mut edges = Vec::with_capacity(divisions * 5);
    for i in 0..divisions {
        let j = (i + 1) % divisions;
        let (base_i, top_i) = (2 + i * 2, 3 + i * 2);
        let (base_j, top_j) = (2 + j * 2, 3 + j * 2);

        faces.push([base_i, top_j, top_i]);
        faces.push([base_i, base_j, top_j]);
        faces.push([BASE_CENTER, base_j, base_i]);
        faces.push([TOP_CENTER, top_i, top_j]);

        edges.push([base_i, base_j]);
        edges.push([top_i, top_j]);
        edges.push([base_i, top_i]);
        edges.push([BASE_CENTER, base_i]);
        edges.push([TOP_CENTER, top_i]);
    }

    Mesh::uniform(vertices, faces, edges, Palette::White)
}

/// Hollow cylinder along +Y from y = 0 to y = `length`.
///
/// `thickness` is the wall thickness and must be smaller than `radius`.
pub fn straight_pipe(radius: f32, length: f32, thickness: f32, divisions: usize) -> Result<Mesh> {
    positive("radius", radius)?;
    positive("length", length)?;
    positive("thickness", thickness)?;
    ensure(thickness < radius, || {
        format!("thickness {} must be smaller than radius {}", thickness, radius)
    })?;
    ensure(divisions >= 3, || format!("pipe needs at least 3 divisions, got {}", divisions))?;

    let inner = radius - thickness;
    let mut vertices = Vec::with_capacity(divisions * 4);
    for angle in ring_angles(divisions) {
        let (cos, sin) = (angle.cos(), angle.sin());
        vertices.push(Point3::new(radius * cos, 0.0, radius * sin));
        vertices.push(Point3::new(radius * cos, length, radius * sin));
        vertices.push(Point3::new(inner * cos, 0.0, inner * sin));
        vertices.push(Point3::new(inner * cos, length, inner * sin));
    }

    let mut faces = Vec::with_capacity(divisions * 8);
    let mut edges = Vec::with_capacity(divisions * 5);
    for i in 0..divisions {
        let j = (i + 1) % divisions;
        // Each angle holds outer base, outer top, inner base, inner top
        let (outer_base_i, outer_top_i) = (i * 4, i * 4 + 1);
        let (inner_base_i, inner_top_i) = (i * 4 + 2, i * 4 + 3);
        let (outer_base_j, outer_top_j) = (j * 4, j * 4 + 1);
        let (inner_base_j, inner_top_j) = (j * 4 + 2, j * 4 + 3);

        // Outer wall
        faces.push([outer_base_i, outer_top_j, outer_top_i]);
        faces.push([outer_base_i, outer_base_j, outer_top_j]);
        // Inner wall
        faces.push([inner_base_i, inner_top_i, inner_top_j]);
        faces.push([inner_base_i, inner_top_j, inner_base_j]);
        // Base ring
        faces.push([outer_base_i, inner_base_i, inner_base_j]);
        faces.push([outer_base_i, inner_base_j, outer_base_j]);
        // Top ring
        faces.push([outer_top_i, inner_top_j, inner_top_i]);
        faces.push([outer_top_i, outer_top_j, inner_top_j]);

        edges.push([outer_base_i, outer_base_j]);
        edges.push([inner_base_i, inner_base_j]);
        edges.push([outer_top_i, outer_top_j]);
        edges.push([inner_top_i, inner_top_j]);
        edges.push([outer_base_i, outer_top_i]);
    }

    Mesh::uniform(vertices, faces, edges, Palette::White)
}

/// Sample a cubic Hermite curve at `samples` evenly spaced parameters in [0, 1]
pub fn hermite_curve(
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    t0: &Vector3<f32>,
    t1: &Vector3<f32>,
    samples: usize,
) -> Result<Vec<Point3<f32>>> {
    ensure(samples >= 2, || format!("a curve needs at least 2 samples, got {}", samples))?;

    let points = (0..samples)
        .map(|k| {
            let t = k as f32 / (samples - 1) as f32;
            let (t2, t3) = (t * t, t * t * t);
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            Point3::from(p0.coords * h00 + t0 * h10 + p1.coords * h01 + t1 * h11)
        })
        .collect();
    Ok(points)
}

/// Hollow pipe swept along a Hermite curve.
///
/// Each of the `segments` curve samples carries a ring of `divisions` outer
/// and inner vertices. The ring plane comes from a Gram-Schmidt frame built
/// against an up vector that starts as world Y and switches to world X for
/// good once the tangent runs parallel to it. Both ends are capped.
#[allow(clippy::too_many_arguments)]
pub fn curved_pipe(
    radius: f32,
    thickness: f32,
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    t0: &Vector3<f32>,
    t1: &Vector3<f32>,
    segments: usize,
    divisions: usize,
) -> Result<Mesh> {
    positive("radius", radius)?;
    positive("thickness", thickness)?;
    ensure(thickness < radius, || {
        format!("thickness {} must be smaller than radius {}", thickness, radius)
    })?;
    ensure(divisions >= 3, || format!("pipe needs at least 3 divisions, got {}", divisions))?;

    let spine = hermite_curve(p0, p1, t0, t1, segments)?;
    let inner = radius - thickness;

    let mut up = Vector3::y();
    let mut vertices = Vec::with_capacity(segments * divisions * 2);
    for i in 0..segments {
        let direction = if i + 1 < segments {
            spine[i + 1] - spine[i]
        } else {
            spine[i] - spine[i - 1]
        };
        let tangent = direction.try_normalize(1e-9).ok_or_else(|| {
            RenderError::InvalidSolid(format!("curve has a zero-length step at sample {}", i))
        })?;

        if (tangent.dot(&up).abs() - 1.0).abs() < 1e-5 {
            up = Vector3::x();
        }
        let normal = (up - tangent * up.dot(&tangent)).normalize();
        let binormal = tangent.cross(&normal);

        for angle in ring_angles(divisions) {
            let offset = normal * angle.cos() + binormal * angle.sin();
            vertices.push(spine[i] + offset * radius);
            vertices.push(spine[i] + offset * inner);
        }
    }

    let outer = |ring: usize, j: usize| (ring * divisions + j) * 2;
    let mut faces: Vec<Face> = Vec::with_capacity((segments - 1) * divisions * 4 + divisions * 4);
    let mut edges: Vec<Edge> = Vec::with_capacity((segments - 1) * divisions * 3);
    for i in 0..segments - 1 {
        for j in 0..divisions {
            let k = (j + 1) % divisions;
            let (v1, v2, v3, v4) = (outer(i, j), outer(i, k), outer(i + 1, k), outer(i + 1, j));

            // Outer wall, then inner wall one index up
            faces.push([v1, v4, v3]);
            faces.push([v1, v3, v2]);
            faces.push([v1 + 1, v3 + 1, v4 + 1]);
            faces.push([v1 + 1, v2 + 1, v3 + 1]);

            edges.push([v1, v2]);
            edges.push([v1 + 1, v2 + 1]);
            edges.push([v1, v4]);
        }
    }

    let last = segments - 1;
    for j in 0..divisions {
        let k = (j + 1) % divisions;

        let (start_j, start_k) = (outer(0, j), outer(0, k));
        faces.push([start_j + 1, start_k, start_j]);
        faces.push([start_j + 1, start_k + 1, start_k]);

        let (end_j, end_k) = (outer(last, j), outer(last, k));
        faces.push([end_j + 1, end_j, end_k]);
        faces.push([end_j + 1, end_k, end_k + 1]);
    }

    Mesh::uniform(vertices, faces, edges, Palette::White)
}

/// A single segment from the origin along +X
pub fn line(length: f32) -> Result<Mesh> {
    positive("length", length)?;
    Mesh::uniform(
        vec![Point3::origin(), Point3::new(length, 0.0, 0.0)],
        vec![],
        vec![[0, 1]],
        Palette::White,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts_and_extent() {
        let mesh = cuboid(8.0, 3.0, 5.0).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);
        assert_eq!(mesh.edges.len(), 12);
        assert!(mesh.colors.iter().all(|&c| c == Palette::White));
        assert!(mesh.vertices.contains(&Point3::new(8.0, 3.0, 5.0)));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        let mesh = cuboid(2.0, 2.0, 2.0).unwrap();
        let center = Point3::new(1.0, 1.0, 1.0);
        for face in &mesh.faces {
            let [a, b, c] = mesh.face_vertices(face).unwrap();
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(normal.dot(&(centroid - center)) > 0.0, "{:?} faces inward", face);
        }
    }

    #[test]
    fn test_cylinder_geometry() {
        let mesh = cylinder(2.0, 6.0, 20).unwrap();
        assert_eq!(mesh.vertices.len(), 2 + 40);
        assert_eq!(mesh.faces.len(), 80);
        assert_eq!(mesh.edges.len(), 100);
        for v in &mesh.vertices[2..] {
            assert!(((v.x * v.x + v.y * v.y).sqrt() - 2.0).abs() < 1e-5);
            assert!(v.z == 0.0 || v.z == 6.0);
        }
        assert!(cylinder(2.0, 6.0, 2).is_err());
    }

    #[test]
    fn test_straight_pipe_geometry() {
        let mesh = straight_pipe(1.5, 8.0, 0.3, 20).unwrap();
        assert_eq!(mesh.vertices.len(), 80);
        assert_eq!(mesh.faces.len(), 160);
        assert!(mesh.vertices.iter().all(|v| v.y == 0.0 || v.y == 8.0));
        let radii: Vec<f32> = mesh
            .vertices
            .iter()
            .map(|v| (v.x * v.x + v.z * v.z).sqrt())
            .collect();
        assert!(radii.iter().all(|r| (r - 1.5).abs() < 1e-5 || (r - 1.2).abs() < 1e-5));
    }

    #[test]
    fn test_pipe_thickness_must_be_below_radius() {
        assert!(matches!(
            straight_pipe(1.0, 5.0, 1.0, 12),
            Err(RenderError::InvalidSolid(_))
        ));
        let (p0, p1) = (Point3::origin(), Point3::new(5.0, 0.0, 0.0));
        assert!(curved_pipe(1.0, 2.0, &p0, &p1, &Vector3::x(), &Vector3::x(), 10, 8).is_err());
    }

    #[test]
    fn test_hermite_curve_endpoints() {
        let p0 = Point3::new(0.0, 3.0, 6.0);
        let p1 = Point3::new(5.0, 8.0, 10.0);
        let t0 = Vector3::new(10.0, 15.0, 5.0);
        let t1 = Vector3::new(5.0, 0.0, 10.0);
        let curve = hermite_curve(&p0, &p1, &t0, &t1, 30).unwrap();
        assert_eq!(curve.len(), 30);
        assert!((curve[0] - p0).norm() < 1e-5);
        assert!((curve[29] - p1).norm() < 1e-4);
        assert!(hermite_curve(&p0, &p1, &t0, &t1, 1).is_err());
    }

    #[test]
    fn test_hermite_straight_line() {
        // Tangents equal to the chord give uniform samples on the segment
        let p0 = Point3::origin();
        let p1 = Point3::new(4.0, 0.0, 0.0);
        let chord = p1 - p0;
        let curve = hermite_curve(&p0, &p1, &chord, &chord, 5).unwrap();
        for (k, point) in curve.iter().enumerate() {
            assert!((point - Point3::new(k as f32, 0.0, 0.0)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_curved_pipe_rings() {
        let p0 = Point3::origin();
        let p1 = Point3::new(10.0, 0.0, 10.0);
        let t0 = Vector3::new(15.0, 0.0, 0.0);
        let t1 = Vector3::new(0.0, 15.0, 0.0);
        let (segments, divisions) = (12, 8);
        let mesh = curved_pipe(1.0, 0.2, &p0, &p1, &t0, &t1, segments, divisions).unwrap();

        assert_eq!(mesh.vertices.len(), segments * divisions * 2);
        assert_eq!(mesh.faces.len(), (segments - 1) * divisions * 4 + divisions * 4);
        assert_eq!(mesh.edges.len(), (segments - 1) * divisions * 3);
        assert!(mesh.validate().is_ok());

        // First ring sits at radius 1 (outer) and 0.8 (inner) around p0
        for j in 0..divisions {
            assert!(((mesh.vertices[j * 2] - p0).norm() - 1.0).abs() < 1e-4);
            assert!(((mesh.vertices[j * 2 + 1] - p0).norm() - 0.8).abs() < 1e-4);
        }
    }

    #[test]
    fn test_curved_pipe_along_up_axis_switches_frame() {
        // A spine straight up +Y is parallel to the initial up vector
        let p0 = Point3::origin();
        let p1 = Point3::new(0.0, 6.0, 0.0);
        let chord = p1 - p0;
        let mesh = curved_pipe(1.0, 0.5, &p0, &p1, &chord, &chord, 4, 6).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_line() {
        let mesh = line(7.0).unwrap();
        assert_eq!(mesh.vertices, vec![Point3::origin(), Point3::new(7.0, 0.0, 0.0)]);
        assert_eq!(mesh.edges, vec![[0, 1]]);
        assert!(mesh.faces.is_empty());
        assert!(line(0.0).is_err());
    }
}
