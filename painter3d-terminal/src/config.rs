/// Render configuration loaded from JSON
///
/// Every section has a default, so a config file only needs the fields it
/// changes. The built-in default is the workshop scene: a box, a cylinder, a
/// straight and a curved pipe, and a red guide line, seen from (15, 13, 12).
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nalgebra::{Matrix4, Point3, Vector3};
use painter3d_core::{Camera, Palette, RenderSettings, Transform};
use serde::{Deserialize, Serialize};

/// Root of a render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    /// Square framebuffer sizes, rendered in this order
    pub resolutions: Vec<usize>,
    /// Color name for overlay lines
    pub line_color: String,
    pub scene: Vec<ObjectConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [15.0, 13.0, 12.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            fov_y_degrees: settings.fov_y_degrees,
            near: settings.near,
            far: settings.far,
        }
    }
}

/// One object of the scene: a shape, its color and its placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    #[serde(flatten)]
    pub shape: Shape,
    /// Face color name; unknown or missing names render white.
    ///
    /// Line shapes take `line_color` from the root of the config instead, and
    /// a color set on one is ignored with a warning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Applied in list order, the first step acting on the shape first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TransformStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        #[serde(default = "default_divisions")]
        divisions: usize,
    },
    StraightPipe {
        radius: f32,
        length: f32,
        thickness: f32,
        #[serde(default = "default_divisions")]
        divisions: usize,
    },
    CurvedPipe {
        radius: f32,
        thickness: f32,
        p0: [f32; 3],
        p1: [f32; 3],
        t0: [f32; 3],
        t1: [f32; 3],
        #[serde(default = "default_segments")]
        segments: usize,
        #[serde(default = "default_divisions")]
        divisions: usize,
    },
    /// Drawn as an overlay segment rather than a surface
    Line { length: f32 },
    /// Path relative to the config file's directory
    Stl { path: PathBuf },
}

fn default_divisions() -> usize {
    20
}

fn default_segments() -> usize {
    50
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStep {
    Translate([f32; 3]),
    /// Degrees
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    Scale([f32; 3]),
}

impl TransformStep {
    pub fn matrix(&self) -> Matrix4<f32> {
        match *self {
            TransformStep::Translate([x, y, z]) => Transform::translation(x, y, z),
            TransformStep::RotateX(degrees) => Transform::rotation_x(degrees),
            TransformStep::RotateY(degrees) => Transform::rotation_y(degrees),
            TransformStep::RotateZ(degrees) => Transform::rotation_z(degrees),
            TransformStep::Scale([x, y, z]) => Transform::scale(x, y, z),
        }
    }
}

impl ObjectConfig {
    pub fn new(shape: Shape, color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::plain(shape)
        }
    }

    /// An uncolored object, as line shapes should be
    pub fn plain(shape: Shape) -> Self {
        Self {
            shape,
            color: None,
            transforms: Vec::new(),
        }
    }

    pub fn then(mut self, step: TransformStep) -> Self {
        self.transforms.push(step);
        self
    }

    /// The placement matrix; later steps multiply on the left
    pub fn placement(&self) -> Matrix4<f32> {
        let steps: Vec<Matrix4<f32>> = self
            .transforms
            .iter()
            .rev()
            .map(TransformStep::matrix)
            .collect();
        Transform::compose(&steps)
    }

    pub fn palette(&self) -> Palette {
        self.color
            .as_deref()
            .map(Palette::resolve_or_default)
            .unwrap_or_default()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            resolutions: vec![100, 250, 800],
            line_color: Palette::Red.name().to_string(),
            scene: vec![
                ObjectConfig::new(
                    Shape::Cuboid {
                        width: 8.0,
                        height: 3.0,
                        depth: 5.0,
                    },
                    "gray",
                )
                .then(TransformStep::Translate([-2.0, -8.0, -2.0])),
                ObjectConfig::new(
                    Shape::Cylinder {
                        radius: 2.0,
                        height: 6.0,
                        divisions: default_divisions(),
                    },
                    "cornflowerblue",
                )
                .then(TransformStep::Translate([5.0, 0.0, 2.0])),
                ObjectConfig::new(
                    Shape::StraightPipe {
                        radius: 1.5,
                        length: 8.0,
                        thickness: 0.3,
                        divisions: default_divisions(),
                    },
                    "lightgreen",
                )
                .then(TransformStep::RotateY(45.0))
                .then(TransformStep::Translate([-8.0, 1.5, 2.0])),
                ObjectConfig::new(
                    Shape::CurvedPipe {
                        radius: 1.0,
                        thickness: 0.2,
                        p0: [0.0, 3.0, 6.0],
                        p1: [5.0, 8.0, 10.0],
                        t0: [10.0, 15.0, 5.0],
                        t1: [5.0, 0.0, 10.0],
                        segments: 30,
                        divisions: 12,
                    },
                    "deepskyblue",
                ),
                ObjectConfig::plain(Shape::Line { length: 7.0 })
                    .then(TransformStep::Translate([0.0, 7.0, 2.0]))
                    .then(TransformStep::RotateZ(30.0))
                    .then(TransformStep::RotateY(45.0)),
            ],
        }
    }
}

impl RenderConfig {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Point3::from(self.camera.eye),
            Point3::from(self.camera.target),
            Vector3::from(self.camera.up),
        )
    }

    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            fov_y_degrees: self.projection.fov_y_degrees,
            near: self.projection.near,
            far: self.projection.far,
            line_color: Palette::resolve_or_default(&self.line_color),
        }
    }
}
