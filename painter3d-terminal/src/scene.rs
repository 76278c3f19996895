/// Scene assembly from a render config
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use painter3d_core::{solids, stl, Mesh, Scene};

use crate::config::{ObjectConfig, RenderConfig, Shape};

/// Build the mesh of one shape in its local frame.
///
/// `base_dir` resolves relative STL paths.
pub fn build_shape(shape: &Shape, base_dir: &Path) -> Result<Mesh> {
    let mesh = match shape {
        Shape::Cuboid {
            width,
            height,
            depth,
        } => solids::cuboid(*width, *height, *depth)?,
        Shape::Cylinder {
            radius,
            height,
            divisions,
        } => solids::cylinder(*radius, *height, *divisions)?,
        Shape::StraightPipe {
            radius,
            length,
            thickness,
            divisions,
        } => solids::straight_pipe(*radius, *length, *thickness, *divisions)?,
        Shape::CurvedPipe {
            radius,
            thickness,
            p0,
            p1,
            t0,
            t1,
            segments,
            divisions,
        } => solids::curved_pipe(
            *radius,
            *thickness,
            &Point3::from(*p0),
            &Point3::from(*p1),
            &Vector3::from(*t0),
            &Vector3::from(*t1),
            *segments,
            *divisions,
        )?,
        Shape::Line { length } => solids::line(*length)?,
        Shape::Stl { path } => {
            let path = base_dir.join(path);
            let data = fs::read(&path)
                .with_context(|| format!("Failed to read STL file {}", path.display()))?;
            let mesh = stl::parse_stl(&data)
                .with_context(|| format!("Failed to parse STL file {}", path.display()))?;
            info!("Loaded {} triangles from {}", mesh.faces.len(), path.display());
            mesh
        }
    };
    Ok(mesh)
}

fn add_object(scene: Scene, object: &ObjectConfig, base_dir: &Path) -> Result<Scene> {
    let mesh = build_shape(&object.shape, base_dir)?.transformed(&object.placement());
    let scene = match object.shape {
        Shape::Line { .. } => {
            if let Some(color) = &object.color {
                warn!("Ignoring color '{}' on a line; lines are drawn in line_color", color);
            }
            scene.with_lines(mesh)
        }
        _ => scene.with_solid(mesh.with_color(object.palette())),
    };
    Ok(scene)
}

/// Build the whole scene, objects in config order
pub fn build_scene(config: &RenderConfig, base_dir: &Path) -> Result<Scene> {
    let scene = config
        .scene
        .iter()
        .enumerate()
        .try_fold(Scene::new(), |scene, (index, object)| {
            add_object(scene, object, base_dir)
                .with_context(|| format!("Failed to build scene object {}", index))
        })?;
    debug!(
        "Built scene: {} faces, {} line segments",
        scene.face_count(),
        scene.edge_count()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformStep;
    use painter3d_core::Palette;

    #[test]
    fn test_default_scene_builds() {
        let scene = build_scene(&RenderConfig::default(), Path::new(".")).unwrap();
        assert!(scene.face_count() > 0);
        assert_eq!(scene.edge_count(), 1);
        assert!(scene.surfaces.colors.contains(&Palette::LightGreen));
        assert!(!scene.surfaces.colors.contains(&Palette::Red));
    }

    #[test]
    fn test_objects_are_placed_and_colored() {
        let config = RenderConfig {
            scene: vec![ObjectConfig::new(
                Shape::Cuboid {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                "tomato",
            )
            .then(TransformStep::Translate([10.0, 0.0, 0.0]))],
            ..RenderConfig::default()
        };
        let scene = build_scene(&config, Path::new(".")).unwrap();
        assert_eq!(scene.face_count(), 12);
        assert!(scene.surfaces.vertices.iter().all(|v| v.x >= 10.0 && v.x <= 11.0));
        assert!(scene.surfaces.colors.iter().all(|&c| c == Palette::Tomato));
    }

    #[test_log::test]
    fn test_line_color_comes_from_settings() {
        let config = RenderConfig {
            scene: vec![ObjectConfig::new(Shape::Line { length: 7.0 }, "tomato")
                .then(TransformStep::Translate([0.0, 7.0, 2.0]))
                .then(TransformStep::RotateZ(30.0))
                .then(TransformStep::RotateY(45.0))],
            ..RenderConfig::default()
        };
        let scene = build_scene(&config, Path::new(".")).unwrap();
        assert_eq!(scene.edge_count(), 1);
        assert_eq!(scene.face_count(), 0);

        let frames =
            painter3d_core::render(&scene, &config.camera(), &config.settings(), &[100]).unwrap();
        assert_eq!(frames[0].count(Palette::Tomato.rgb()), 0);
        assert!(frames[0].count(Palette::Red.rgb()) > 0);
        assert_eq!(frames[0].covered(), frames[0].count(Palette::Red.rgb()));
    }

    #[test]
    fn test_invalid_object_reports_its_index() {
        let config = RenderConfig {
            scene: vec![
                ObjectConfig::new(Shape::Line { length: 1.0 }, "red"),
                ObjectConfig::new(
                    Shape::StraightPipe {
                        radius: 1.0,
                        length: 2.0,
                        thickness: 3.0,
                        divisions: 8,
                    },
                    "gray",
                ),
            ],
            ..RenderConfig::default()
        };
        let err = build_scene(&config, Path::new(".")).unwrap_err();
        assert!(format!("{:#}", err).contains("scene object 1"));
    }

    #[test]
    fn test_missing_stl_file() {
        let shape = Shape::Stl {
            path: "does-not-exist.stl".into(),
        };
        let err = build_shape(&shape, Path::new("/nonexistent")).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.stl"));
    }
}
