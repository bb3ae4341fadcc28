//! framescope: an interactive debugging viewer for frame-stepped scene dumps.
//!
//! A program under test prints a small text protocol describing what it is
//! doing, one frame at a time, and framescope lets you step through those
//! frames, click on primitives and inspect them.
//!
//! # Quick Start
//!
//! ```
//! use framescope::*;
//!
//! init();
//!
//! let mut viewer = Viewer::new(Options::default());
//! viewer.load_scene(r#"framestart( drawtriangle "T" [0,0,0][1,0,0][0,1,0] frameend("#);
//! viewer.apply_pending_fit();
//!
//! let camera = viewer.camera();
//! let viewport = Vec2::new(800.0, 600.0);
//! if let Some(ray) = camera.screen_ray(viewport * 0.5, viewport) {
//!     viewer.pick(&ray, viewport.y);
//! }
//! ```
//!
//! # Protocol
//!
//! ```text
//! framestart( ... frameend(
//! drawtriangle ["Name"] [x,y,z] [x,y,z] [x,y,z] [r,g,b,a]
//! drawline     ["Name"] [x,y,z] [x,y,z] [r,g,b,a]
//! drawpoint    ["Name"] [x,y,z] [r,g,b,a]
//! ```
//!
//! Names and colors are optional; primitives without a color get a stable
//! one derived from their position in the frame.

// Accessors mirror the scene model and don't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod camera;
mod overlay_cache;
mod viewer;

// Re-export core types
pub use framescope_core::{
    color_for, fit_points, fit_view, nearest_triangle_hit, parse_obj, parse_obj_with_report,
    parse_scene, Frame, FramescopeError, ObjReport, Options, ParseStats, PickHit, Picker,
    Primitive, PrimitiveKind, Ray, Result, SceneModel, SceneParser, UnterminatedFramePolicy,
    Vertex, ViewCamera, ViewFit,
};
pub use framescope_core::{Mat4, Vec2, Vec3, Vec4};

pub use camera::OrbitCamera;
pub use overlay_cache::OverlayCache;
pub use viewer::Viewer;

/// Initializes logging.
///
/// Log output is controlled through `RUST_LOG`. Calling this more than once
/// is harmless.
pub fn init() {
    let _ = env_logger::try_init();
    log::info!("framescope initialized");
}
