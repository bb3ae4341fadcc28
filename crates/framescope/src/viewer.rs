//! The viewer: scene model, camera and options behind one interface.
//!
//! Windowing, input mapping and rendering call into [`Viewer`]; it never
//! calls back out. Loads and clears raise a fit request that the render
//! loop settles with [`Viewer::apply_pending_fit`].

use log::{info, warn};

use framescope_core::{
    fit_view, nearest_triangle_hit, parse_obj_with_report, ObjReport, Options, ParseStats,
    Picker, Primitive, Ray, Result, SceneModel, SceneParser, Vec3, ViewCamera, ViewFit,
};

use crate::camera::OrbitCamera;

/// Scene state plus the camera it is viewed through.
#[derive(Debug)]
pub struct Viewer<C: ViewCamera = OrbitCamera> {
    scene: SceneModel,
    camera: C,
    options: Options,
    parser: SceneParser,
    picker: Picker,
}

impl Default for Viewer<OrbitCamera> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Viewer<OrbitCamera> {
    /// Creates a viewer with an [`OrbitCamera`].
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_camera(OrbitCamera::default(), options)
    }
}

impl<C: ViewCamera> Viewer<C> {
    /// Creates a viewer around an existing camera.
    #[must_use]
    pub fn with_camera(camera: C, options: Options) -> Self {
        Self {
            scene: SceneModel::new(),
            camera,
            parser: SceneParser::new(options.parser),
            picker: Picker::new(&options.pick),
            options,
        }
    }

    // === Loading ===

    /// Replaces all frames with those parsed from `text`.
    pub fn load_scene(&mut self, text: &str) -> ParseStats {
        let (frames, stats) = self.parser.parse_with_stats(text);
        info!(
            "loaded scene: {} frames, {} primitives",
            stats.frames, stats.primitives
        );
        self.scene.replace_frames(frames);
        self.scene.request_fit();
        stats
    }

    /// Appends the frames parsed from `text` after the existing ones.
    pub fn append_scene(&mut self, text: &str) -> ParseStats {
        let (frames, stats) = self.parser.parse_with_stats(text);
        info!(
            "appended {} frames, {} total",
            stats.frames,
            self.scene.frame_count() + stats.frames
        );
        self.scene.append_frames(frames);
        self.scene.request_fit();
        stats
    }

    /// Replaces the overlay with the mesh parsed from OBJ `text`.
    pub fn load_overlay(&mut self, text: &str) -> ObjReport {
        let (mesh, report) = parse_obj_with_report(text);
        info!(
            "loaded overlay: {} triangles from {} faces",
            report.triangles, report.faces
        );
        self.scene.replace_overlay(mesh);
        self.scene.request_fit();
        report
    }

    /// Removes the overlay.
    pub fn clear_overlay(&mut self) {
        self.scene.clear_overlay();
        self.scene.request_fit();
    }

    /// Removes every frame.
    pub fn clear_frames(&mut self) {
        self.scene.clear_frames();
        self.scene.request_fit();
    }

    // === Frames and selection ===

    /// Index of the current frame, `None` without frames.
    pub fn current_frame_index(&self) -> Option<usize> {
        self.scene.current_frame_index()
    }

    /// Number of loaded frames.
    pub fn frame_count(&self) -> usize {
        self.scene.frame_count()
    }

    /// Jumps to frame `index`, clamped; clears the selection.
    pub fn set_current_frame(&mut self, index: usize) {
        self.scene.set_current_frame(index);
    }

    /// Moves `delta` frames, clamped; clears the selection.
    pub fn step_frame(&mut self, delta: isize) -> Option<usize> {
        self.scene.step_frame(delta)
    }

    /// The selected primitive index within the current frame.
    pub fn selection(&self) -> Option<usize> {
        self.scene.selection()
    }

    /// Sets or clears the selection, e.g. from a click in the primitive list.
    pub fn set_selection(&mut self, selection: Option<usize>) -> Result<bool> {
        self.scene.set_selection(selection)
    }

    /// Returns and clears the primitive list's pending scroll request.
    pub fn take_scroll_request(&mut self) -> bool {
        self.scene.take_scroll_request()
    }

    /// Primitives of the current frame, in list order.
    pub fn primitives_of_current_frame(&self) -> &[Primitive] {
        self.scene.current_primitives()
    }

    // === View ===

    /// Asks for the camera to be refitted on the next frame.
    pub fn request_fit(&mut self) {
        self.scene.request_fit();
    }

    /// Returns and clears the pending fit request without applying it.
    pub fn consume_fit_request(&mut self) -> bool {
        self.scene.consume_fit_request()
    }

    /// Settles a pending fit request by re-aiming the camera.
    ///
    /// Returns the applied fit; `None` if nothing was pending or the scene
    /// has no geometry. Either way the request is consumed.
    pub fn apply_pending_fit(&mut self) -> Option<ViewFit> {
        if !self.scene.consume_fit_request() {
            return None;
        }
        let fit = fit_view(&self.scene, &self.options.fit)?;
        self.camera.set_view(&fit);
        Some(fit)
    }

    // === Picking ===

    /// Selects the primitive under `ray`.
    ///
    /// A miss leaves the selection as it was. Returns the picked index.
    pub fn pick(&mut self, ray: &Ray, viewport_height: f32) -> Option<usize> {
        let hit = self.picker.pick(
            ray,
            self.scene.current_primitives(),
            viewport_height,
            self.camera.eye_distance(),
        )?;
        match self.scene.set_selection(Some(hit.index)) {
            Ok(_) => Some(hit.index),
            Err(err) => {
                warn!("pick result rejected: {err}");
                None
            }
        }
    }

    /// World-space point where `ray` first hits overlay or frame triangles.
    pub fn nearest_triangle_hit(&self, ray: &Ray) -> Option<Vec3> {
        nearest_triangle_hit(ray, self.scene.current_primitives(), self.scene.overlay())
    }

    /// Moves the camera target to the triangle under `ray`, if any.
    pub fn recenter(&mut self, ray: &Ray) -> Option<Vec3> {
        let point = self.nearest_triangle_hit(ray)?;
        self.camera.set_target(point);
        Some(point)
    }

    // === Accessors ===

    /// The underlying scene model.
    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    /// The camera the scene is viewed through.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Mutable access to the camera, for input handling.
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    /// Options the viewer was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }
}
