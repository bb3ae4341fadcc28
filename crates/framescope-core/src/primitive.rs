//! Scene data model: vertices, primitives and frames.

use std::fmt;

use glam::{Vec3, Vec4};

use crate::color::color_for;

/// Normal given to every `drawpoint` vertex.
pub const POINT_NORMAL: Vec3 = Vec3::Z;

/// Color used for an overlay mesh (lit gray).
pub const OVERLAY_MESH_COLOR: Vec4 = Vec4::new(0.7, 0.7, 0.7, 1.0);

/// A position with an optional normal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    /// Creates a vertex with a zero normal.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
        }
    }

    /// Creates a vertex with the given normal.
    #[must_use]
    pub fn with_normal(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// The shape of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Triangle,
    Line,
    Point,
    /// Indexed triangle mesh loaded from OBJ text.
    OverlayMesh,
}

impl PrimitiveKind {
    /// Number of vertices a complete primitive of this kind has.
    ///
    /// `None` for meshes, whose vertex count is free.
    #[must_use]
    pub fn vertex_count(self) -> Option<usize> {
        match self {
            Self::Triangle => Some(3),
            Self::Line => Some(2),
            Self::Point => Some(1),
            Self::OverlayMesh => None,
        }
    }

    /// Name used when the protocol gives none.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Triangle => "Unnamed Triangle",
            Self::Line => "Unnamed Line",
            Self::Point => "Unnamed Point",
            Self::OverlayMesh => "Overlay Mesh",
        }
    }

    /// Type name shown in primitive listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Triangle => "drawtriangle",
            Self::Line => "drawline",
            Self::Point => "drawpoint",
            Self::OverlayMesh => "overlaymesh",
        }
    }

    /// Whether primitives of this kind may become the selection.
    #[must_use]
    pub fn is_selectable(self) -> bool {
        !matches!(self, Self::OverlayMesh)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One drawable unit: a triangle, line, point or overlay mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub kind: PrimitiveKind,
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`; only used by [`PrimitiveKind::OverlayMesh`].
    pub indices: Vec<u32>,
    pub color: Vec4,
}

impl Primitive {
    /// Builds an overlay mesh from flat vertex and index arrays.
    #[must_use]
    pub fn overlay_mesh(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: PrimitiveKind::OverlayMesh.default_name().to_string(),
            kind: PrimitiveKind::OverlayMesh,
            vertices,
            indices,
            color: OVERLAY_MESH_COLOR,
        }
    }

    /// Returns true if the vertex (and index) counts match the kind.
    ///
    /// The parser keeps truncated primitives; they are listed but never
    /// drawn or picked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.kind.vertex_count() {
            Some(n) => self.vertices.len() == n,
            None => {
                self.indices.len() % 3 == 0
                    && self
                        .indices
                        .iter()
                        .all(|&i| (i as usize) < self.vertices.len())
            }
        }
    }

    /// Iterates vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Iterates the triangles of a complete triangle or mesh primitive.
    ///
    /// Lines, points and incomplete primitives yield nothing.
    pub fn triangles(&self) -> Box<dyn Iterator<Item = [Vec3; 3]> + '_> {
        if !self.is_complete() {
            return Box::new(std::iter::empty());
        }
        match self.kind {
            PrimitiveKind::Triangle => Box::new(std::iter::once([
                self.vertices[0].position,
                self.vertices[1].position,
                self.vertices[2].position,
            ])),
            PrimitiveKind::OverlayMesh => Box::new(self.indices.chunks_exact(3).map(|tri| {
                [
                    self.vertices[tri[0] as usize].position,
                    self.vertices[tri[1] as usize].position,
                    self.vertices[tri[2] as usize].position,
                ]
            })),
            PrimitiveKind::Line | PrimitiveKind::Point => Box::new(std::iter::empty()),
        }
    }

    /// Label for the primitive list, e.g. `"Wall 3 (drawtriangle)"`.
    #[must_use]
    pub fn list_label(&self, index: usize) -> String {
        format!("{} {} ({})", self.name, index, self.kind)
    }
}

/// One step of the debug trace: primitives in draw and pick order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub primitives: Vec<Primitive>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of primitives in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns true if the frame has no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// RGBA color filled channel by channel; unset channels stay at 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBuilder {
    channels: [f32; 4],
}

impl Default for ColorBuilder {
    fn default() -> Self {
        Self {
            channels: [1.0; 4],
        }
    }
}

impl ColorBuilder {
    /// Sets channel `index` (0 = red .. 3 = alpha); out of range is ignored.
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(channel) = self.channels.get_mut(index) {
            *channel = value;
        }
    }

    /// Finishes the color.
    #[must_use]
    pub fn build(self) -> Vec4 {
        Vec4::from_array(self.channels)
    }
}

/// Accumulates a primitive while it is being parsed.
///
/// The name and color are optional until [`PrimitiveBuilder::build`], where
/// the kind's default name and the identity color are filled in.
#[derive(Debug, Clone)]
pub struct PrimitiveBuilder {
    kind: PrimitiveKind,
    name: Option<String>,
    vertices: Vec<Vertex>,
    color: Option<Vec4>,
}

impl PrimitiveBuilder {
    /// Starts a primitive of the given kind.
    #[must_use]
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            name: None,
            vertices: Vec::with_capacity(kind.vertex_count().unwrap_or(0)),
            color: None,
        }
    }

    /// The kind being built.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Number of vertices collected so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a vertex position. Points get the fixed up normal.
    pub fn push_position(&mut self, position: Vec3) {
        let normal = if self.kind == PrimitiveKind::Point {
            POINT_NORMAL
        } else {
            Vec3::ZERO
        };
        self.vertices.push(Vertex::with_normal(position, normal));
    }

    /// Sets an explicit color.
    #[must_use]
    pub fn color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    /// Finishes the primitive. `index` is its position within its frame and
    /// keys the generated color when none was given.
    #[must_use]
    pub fn build(self, index: usize) -> Primitive {
        Primitive {
            name: self
                .name
                .unwrap_or_else(|| self.kind.default_name().to_string()),
            kind: self.kind,
            vertices: self.vertices,
            indices: Vec::new(),
            color: self.color.unwrap_or_else(|| color_for(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Primitive {
        let mut builder = PrimitiveBuilder::new(PrimitiveKind::Triangle).name("T");
        builder.push_position(Vec3::ZERO);
        builder.push_position(Vec3::X);
        builder.push_position(Vec3::Y);
        builder.build(0)
    }

    #[test]
    fn test_builder_defaults() {
        let builder = PrimitiveBuilder::new(PrimitiveKind::Line);
        assert_eq!(builder.kind(), PrimitiveKind::Line);
        assert_eq!(builder.vertex_count(), 0);
        let prim = builder.build(4);
        assert_eq!(prim.name, "Unnamed Line");
        assert_eq!(prim.color, color_for(4));
        assert!(prim.indices.is_empty());
        assert!(!prim.is_complete());
    }

    #[test]
    fn test_builder_explicit_color() {
        let prim = PrimitiveBuilder::new(PrimitiveKind::Point)
            .color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .build(0);
        assert_eq!(prim.color, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_point_normal_is_up() {
        let mut builder = PrimitiveBuilder::new(PrimitiveKind::Point);
        builder.push_position(Vec3::ONE);
        let prim = builder.build(0);
        assert_eq!(prim.vertices[0].normal, POINT_NORMAL);
        assert!(prim.is_complete());
    }

    #[test]
    fn test_color_builder_partial() {
        let mut color = ColorBuilder::default();
        color.set(0, 0.25);
        color.set(7, 0.0);
        assert_eq!(color.build(), Vec4::new(0.25, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_triangle_iteration() {
        let prim = triangle();
        assert_eq!(prim.triangles().count(), 1);

        let mut truncated = prim.clone();
        truncated.vertices.pop();
        assert!(!truncated.is_complete());
        assert_eq!(truncated.triangles().count(), 0);
    }

    #[test]
    fn test_mesh_completeness() {
        let verts = vec![Vertex::new(Vec3::ZERO), Vertex::new(Vec3::X), Vertex::new(Vec3::Y)];
        let mesh = Primitive::overlay_mesh(verts.clone(), vec![0, 1, 2]);
        assert!(mesh.is_complete());
        assert_eq!(mesh.triangles().count(), 1);
        assert_eq!(mesh.color, OVERLAY_MESH_COLOR);

        let bad = Primitive::overlay_mesh(verts, vec![0, 1, 3]);
        assert!(!bad.is_complete());
        assert_eq!(bad.triangles().count(), 0);
    }

    #[test]
    fn test_list_label() {
        assert_eq!(triangle().list_label(2), "T 2 (drawtriangle)");
        assert!(!PrimitiveKind::OverlayMesh.is_selectable());
        assert!(PrimitiveKind::Point.is_selectable());
    }
}
