/// Indexed meshes and scene composition
use nalgebra::{Matrix4, Point3};

use crate::color::Palette;
use crate::error::{RenderError, Result};
use crate::transform::Transform;

/// A triangle as three indices into a vertex list
pub type Face = [usize; 3];

/// A line segment as two indices into a vertex list
pub type Edge = [usize; 2];

/// An indexed mesh of triangles and line segments.
///
/// `colors` runs parallel to `faces`. Every index stored in `faces` and
/// `edges` is a valid offset into `vertices`; the constructors and
/// [`Mesh::concat`] maintain this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
    pub colors: Vec<Palette>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from raw parts, checking every index and the color count
    pub fn from_parts(
        vertices: Vec<Point3<f32>>,
        faces: Vec<Face>,
        edges: Vec<Edge>,
        colors: Vec<Palette>,
    ) -> Result<Self> {
        let mesh = Self {
            vertices,
            faces,
            edges,
            colors,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a mesh whose faces all share one color
    pub fn uniform(
        vertices: Vec<Point3<f32>>,
        faces: Vec<Face>,
        edges: Vec<Edge>,
        color: Palette,
    ) -> Result<Self> {
        let colors = vec![color; faces.len()];
        Self::from_parts(vertices, faces, edges, colors)
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.len() != self.faces.len() {
            return Err(RenderError::ColorCountMismatch {
                faces: self.faces.len(),
                colors: self.colors.len(),
            });
        }

        let len = self.vertices.len();
        let faces = self.faces.iter().map(|f| ("Face", f.as_slice()));
        let edges = self.edges.iter().map(|e| ("Edge", e.as_slice()));
        for (element, (kind, indices)) in faces.enumerate().chain(edges.enumerate()) {
            if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                return Err(RenderError::IndexOutOfRange {
                    kind,
                    element,
                    index,
                    len,
                });
            }
        }
        Ok(())
    }

    /// Recolor every face
    pub fn with_color(mut self, color: Palette) -> Self {
        self.colors = vec![color; self.faces.len()];
        self
    }

    /// Apply a matrix to every vertex
    pub fn transformed(mut self, matrix: &Matrix4<f32>) -> Self {
        self.vertices = Transform::apply_points(matrix, &self.vertices);
        self
    }

    /// Append `other`, rebasing its indices past this mesh's vertices
    pub fn concat(mut self, other: Mesh) -> Self {
        let offset = self.vertices.len();
        self.vertices.extend(other.vertices);
        self.faces
            .extend(other.faces.iter().map(|face| face.map(|i| i + offset)));
        self.edges
            .extend(other.edges.iter().map(|edge| edge.map(|i| i + offset)));
        self.colors.extend(other.colors);
        self
    }

    /// The vertices of one face, or `None` if an index is out of range
    pub fn face_vertices(&self, face: &Face) -> Option<[Point3<f32>; 3]> {
        Some([
            *self.vertices.get(face[0])?,
            *self.vertices.get(face[1])?,
            *self.vertices.get(face[2])?,
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }
}

/// Everything drawn in one frame: filled surfaces plus overlay line segments.
///
/// Scenes are built by folding meshes in; each step consumes the scene and
/// returns the grown one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Faces and their colors; edges of solids are not drawn
    pub surfaces: Mesh,
    /// Segments drawn over the surfaces; faces are ignored
    pub lines: Mesh,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solid's faces
    pub fn with_solid(self, solid: Mesh) -> Self {
        let solid = Mesh {
            edges: Vec::new(),
            ..solid
        };
        Self {
            surfaces: self.surfaces.concat(solid),
            lines: self.lines,
        }
    }

    /// Add a mesh's edges as overlay lines
    pub fn with_lines(self, lines: Mesh) -> Self {
        let lines = Mesh {
            vertices: lines.vertices,
            edges: lines.edges,
            ..Mesh::default()
        };
        Self {
            surfaces: self.surfaces,
            lines: self.lines.concat(lines),
        }
    }

    pub fn face_count(&self) -> usize {
        self.surfaces.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.lines.edges.len()
    }
}

impl FromIterator<Mesh> for Scene {
    /// Collect solids into a scene
    fn from_iter<I: IntoIterator<Item = Mesh>>(iter: I) -> Self {
        iter.into_iter().fold(Scene::new(), Scene::with_solid)
    }
}
