/// Depth ordering of faces (painter's algorithm)
use log::{debug, warn};
use nalgebra::{Matrix4, Point3};

use crate::color::Palette;
use crate::geometry::Scene;
use crate::transform::Transform;

/// A face ready to be drawn, with its camera-space depth
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    /// World-space vertices of the face
    pub vertices: [Point3<f32>; 3],
    pub color: Palette,
    /// Mean camera-space z of the vertices; more negative is farther away
    pub depth: f32,
}

/// Sort the scene's faces back to front, dropping those outside `(near, far)`.
///
/// Depth is the average camera-space z of the face's vertices, so a face
/// straddling a clipping plane is kept or dropped whole based on its
/// centroid. The order is only correct for scenes whose faces can be
/// separated in depth; interpenetrating or cyclically overlapping faces have
/// no valid back-to-front order. Faces with equal depth keep scene order.
pub fn order_faces(scene: &Scene, view: &Matrix4<f32>, near: f32, far: f32) -> Vec<Renderable> {
    let mesh = &scene.surfaces;
    let camera_space = Transform::apply_points(view, &mesh.vertices);

    let mut ordered = Vec::with_capacity(mesh.faces.len());
    for (index, face) in mesh.faces.iter().enumerate() {
        let Some(vertices) = mesh.face_vertices(face) else {
            warn!("Skipping face {} with out-of-range indices {:?}", index, face);
            continue;
        };

        // camera_space is parallel to mesh.vertices, so these indices are valid
        let depth = face.iter().map(|&i| camera_space[i].z).sum::<f32>() / face.len() as f32;
        if !(depth < -near && depth > -far) {
            continue;
        }

        let color = mesh.colors.get(index).copied().unwrap_or_else(|| {
            warn!("Face {} has no color, using {}", index, Palette::default());
            Palette::default()
        });
        ordered.push(Renderable {
            vertices,
            color,
            depth,
        });
    }

    // Stable: equal depths stay in scene order
    ordered.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    debug!(
        "Ordered {} of {} faces ({} culled by depth)",
        ordered.len(),
        mesh.faces.len(),
        mesh.faces.len() - ordered.len()
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::geometry::Mesh;

    /// A small triangle in the plane z = `z`, facing a camera at the origin
    fn triangle_at(z: f32, color: Palette) -> Mesh {
        Mesh::uniform(
            vec![
                Point3::new(-0.5, -0.5, z),
                Point3::new(0.5, -0.5, z),
                Point3::new(0.0, 0.5, z),
            ],
            vec![[0, 1, 2]],
            vec![],
            color,
        )
        .unwrap()
    }

    fn identity_view() -> Matrix4<f32> {
        Camera::new(Point3::origin(), Point3::new(0.0, 0.0, -1.0), nalgebra::Vector3::y())
            .view_matrix()
            .unwrap()
    }

    #[test]
    fn test_farther_face_comes_first() {
        let scene = Scene::new()
            .with_solid(triangle_at(-5.0, Palette::Red))
            .with_solid(triangle_at(-10.0, Palette::Gray));
        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);

        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].color, Palette::Gray);
        assert!((ordered[0].depth + 10.0).abs() < 1e-5);
        assert_eq!(ordered[1].color, Palette::Red);
        assert!((ordered[1].depth + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_faces_outside_near_far_are_culled() {
        let scene = Scene::new()
            .with_solid(triangle_at(-0.5, Palette::Red))
            .with_solid(triangle_at(-60.0, Palette::Gray))
            .with_solid(triangle_at(3.0, Palette::Tomato))
            .with_solid(triangle_at(-1.0, Palette::Black))
            .with_solid(triangle_at(-20.0, Palette::LightGreen));
        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);

        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].color, Palette::LightGreen);
    }

    #[test]
    fn test_face_straddling_near_plane_is_kept_by_centroid() {
        // Vertices at z = 0.5, -2 and -3: one is behind the near plane but the
        // centroid sits at z = -1.5
        let straddling = Mesh::uniform(
            vec![
                Point3::new(0.0, 0.0, 0.5),
                Point3::new(1.0, 0.0, -2.0),
                Point3::new(0.0, 1.0, -3.0),
            ],
            vec![[0, 1, 2]],
            vec![],
            Palette::DeepSkyBlue,
        )
        .unwrap();
        let scene = Scene::new().with_solid(straddling);
        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);

        assert_eq!(ordered.len(), 1);
        assert!((ordered[0].depth + 1.5).abs() < 1e-5);
        assert_eq!(ordered[0].vertices[0], Point3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_face_straddling_far_plane_is_kept_by_centroid() {
        // One vertex beyond the far plane at z = -60, centroid at z = -45
        let straddling = Mesh::uniform(
            vec![
                Point3::new(0.0, 0.0, -60.0),
                Point3::new(1.0, 0.0, -40.0),
                Point3::new(0.0, 1.0, -35.0),
            ],
            vec![[0, 1, 2]],
            vec![],
            Palette::LightGreen,
        )
        .unwrap();
        // Same shape pushed back so that the centroid passes the far plane
        let beyond = straddling
            .clone()
            .transformed(&Transform::translation(0.0, 0.0, -10.0))
            .with_color(Palette::Gray);
        let scene = Scene::new().with_solid(straddling).with_solid(beyond);
        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);

        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].color, Palette::LightGreen);
        assert!((ordered[0].depth + 45.0).abs() < 1e-4);
    }

    #[test_log::test]
    fn test_missing_color_defaults_to_white() {
        let mut scene = Scene::new().with_solid(triangle_at(-5.0, Palette::Red));
        scene.surfaces.colors.clear();

        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].color, Palette::White);
    }

    #[test]
    fn test_equal_depths_keep_scene_order() {
        let scene = Scene::new()
            .with_solid(triangle_at(-7.0, Palette::Red))
            .with_solid(triangle_at(-7.0, Palette::Gray))
            .with_solid(triangle_at(-7.0, Palette::Tomato));
        let colors: Vec<Palette> = order_faces(&scene, &identity_view(), 1.0, 50.0)
            .iter()
            .map(|r| r.color)
            .collect();
        assert_eq!(colors, vec![Palette::Red, Palette::Gray, Palette::Tomato]);
    }

    #[test]
    fn test_depth_uses_the_view_matrix() {
        // Camera on +X looking back at the origin: world x becomes depth
        let eye = Point3::new(20.0, 0.0, 0.0);
        let view = Camera::new(eye, Point3::origin(), nalgebra::Vector3::y())
            .view_matrix()
            .unwrap();
        let near_side = Transform::translation(15.0, 0.0, 0.0);
        let far_side = Transform::translation(-5.0, 0.0, 0.0);
        let scene = Scene::new()
            .with_solid(triangle_at(0.0, Palette::Red).transformed(&near_side))
            .with_solid(triangle_at(0.0, Palette::Gray).transformed(&far_side));
        let ordered = order_faces(&scene, &view, 1.0, 50.0);

        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].color, Palette::Gray);
        assert!((ordered[0].depth + 25.0).abs() < 1e-4);
        assert!((ordered[1].depth + 5.0).abs() < 1e-4);
    }

    #[test_log::test]
    fn test_invalid_indices_are_skipped() {
        let mut scene = Scene::new().with_solid(triangle_at(-5.0, Palette::Red));
        scene.surfaces.faces.push([0, 1, 42]);
        scene.surfaces.colors.push(Palette::Gray);

        let ordered = order_faces(&scene, &identity_view(), 1.0, 50.0);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].color, Palette::Red);
    }
}
