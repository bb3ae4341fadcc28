//! Core of framescope.
//!
//! This crate holds everything the viewer needs that does not touch a window
//! or a GPU:
//! - [`SceneParser`] turns the textual scene protocol into [`Frame`]s
//! - [`parse_obj`] turns OBJ text into an overlay mesh
//! - [`SceneModel`] owns frames, overlay, the current frame and the selection
//! - [`fit_view`] frames the visible geometry
//! - [`Picker`] resolves a ray to a primitive of the current frame
//! - [`color_for`] gives primitives without an explicit color a stable one

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Vertex and index counts stay far below f32/u32 precision limits
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Short math names (v0, v1, a, b) mirror the formulas
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod camera;
pub mod color;
pub mod error;
pub mod fit;
pub mod math;
pub mod obj;
pub mod options;
pub mod pick;
pub mod primitive;
pub mod protocol;
pub mod scene;

pub use camera::ViewCamera;
pub use color::color_for;
pub use error::{FramescopeError, Result};
pub use fit::{fit_points, fit_view, ViewFit};
pub use math::{Aabb, Ray};
pub use obj::{parse_obj, parse_obj_with_report, ObjReport};
pub use options::{FitOptions, Options, ParserOptions, PickOptions, UnterminatedFramePolicy};
pub use pick::{nearest_triangle_hit, PickHit, Picker};
pub use primitive::{Frame, Primitive, PrimitiveBuilder, PrimitiveKind, Vertex};
pub use protocol::{parse_scene, ParseStats, SceneParser};
pub use scene::SceneModel;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
