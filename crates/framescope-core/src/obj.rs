//! Minimal Wavefront OBJ reader for overlay meshes.
//!
//! Only `v` and `f` lines are read. Faces are fan-triangulated around their
//! first vertex and every emitted triangle carries its own flat normal, so
//! the output mesh has three unshared vertices per triangle.

use glam::Vec3;
use log::{debug, trace, warn};

use crate::error::FramescopeError;
use crate::math::face_normal;
use crate::primitive::{Primitive, Vertex};

/// Summary of one OBJ import.
#[derive(Debug, Default)]
pub struct ObjReport {
    /// `v` lines read.
    pub positions: usize,
    /// `f` lines read, including skipped ones.
    pub faces: usize,
    /// Triangles emitted.
    pub triangles: usize,
    /// Faces with fewer than three vertices.
    pub short_faces: usize,
    /// Triangles whose normal could not be computed (left as zero).
    pub degenerate_triangles: usize,
    /// Faces dropped because of a bad vertex reference.
    pub skipped_faces: Vec<FramescopeError>,
}

/// Parses OBJ text into an overlay mesh.
#[must_use]
pub fn parse_obj(text: &str) -> Primitive {
    parse_obj_with_report(text).0
}

/// Parses OBJ text into an overlay mesh and reports what was skipped.
#[must_use]
pub fn parse_obj_with_report(text: &str) -> (Primitive, ObjReport) {
    let mut report = ObjReport::default();
    let mut positions: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Vec<i64>> = Vec::new();

    for (line_number, line) in text.lines().enumerate() {
        let line = line.split_once('#').map_or(line, |(content, _)| content);
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for (slot, token) in coords.iter_mut().zip(tokens) {
                    match token.parse::<f32>() {
                        Ok(value) if value.is_finite() => *slot = value,
                        _ => trace!("line {}: bad coordinate '{token}'", line_number + 1),
                    }
                }
                positions.push(Vec3::from_array(coords));
            }
            Some("f") => {
                report.faces += 1;
                match parse_face(tokens) {
                    Ok(face) => faces.push(face),
                    Err(err) => {
                        warn!("line {}: skipping face: {err}", line_number + 1);
                        report.skipped_faces.push(err);
                    }
                }
            }
            _ => {}
        }
    }
    report.positions = positions.len();

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for face in faces {
        if face.len() < 3 {
            report.short_faces += 1;
            continue;
        }
        let corners = match resolve_face(&face, &positions) {
            Ok(corners) => corners,
            Err(err) => {
                warn!("skipping face: {err}");
                report.skipped_faces.push(err);
                continue;
            }
        };

        let v0 = corners[0];
        for pair in corners[1..].windows(2) {
            let (v1, v2) = (pair[0], pair[1]);
            let normal = face_normal(v0, v1, v2);
            if normal == Vec3::ZERO {
                report.degenerate_triangles += 1;
            }
            #[allow(clippy::cast_possible_truncation)]
            let base = vertices.len() as u32;
            vertices.extend([v0, v1, v2].map(|p| Vertex::with_normal(p, normal)));
            indices.extend([base, base + 1, base + 2]);
            report.triangles += 1;
        }
    }

    debug!(
        "OBJ import: {} positions, {} faces, {} triangles, {} skipped",
        report.positions,
        report.faces,
        report.triangles,
        report.skipped_faces.len()
    );
    (Primitive::overlay_mesh(vertices, indices), report)
}

/// Reads the position index (before any `/`) of each face reference.
fn parse_face<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<i64>, FramescopeError> {
    tokens
        .map(|token| {
            let index = token.split('/').next().unwrap_or(token);
            index
                .parse::<i64>()
                .map_err(|_| FramescopeError::MalformedFaceReference(token.to_string()))
        })
        .collect()
}

/// Looks up 1-based references; any reference outside the vertex list
/// rejects the whole face.
fn resolve_face(face: &[i64], positions: &[Vec3]) -> Result<Vec<Vec3>, FramescopeError> {
    face.iter()
        .map(|&reference| {
            reference
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| positions.get(i).copied())
                .ok_or(FramescopeError::InvalidFaceReference {
                    reference,
                    vertex_count: positions.len(),
                })
        })
        .collect()
}
