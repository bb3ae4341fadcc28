//! The scene model: frames, overlay, current frame and selection.
//!
//! Selection indices only mean something relative to one frame's primitive
//! list, so every operation that changes the current frame (or replaces the
//! frames) clears the selection.

use glam::Vec3;
use log::debug;

use crate::error::{FramescopeError, Result};
use crate::primitive::{Frame, Primitive};

/// Frames, overlay and the viewer's cursor into them.
#[derive(Debug, Default)]
pub struct SceneModel {
    frames: Vec<Frame>,
    overlay: Vec<Primitive>,
    current_frame: Option<usize>,
    selection: Option<usize>,
    scroll_to_selection: bool,
    fit_requested: bool,
    overlay_generation: u64,
}

impl SceneModel {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Frames ===

    /// Replaces all frames, resetting to the first frame with no selection.
    pub fn replace_frames(&mut self, frames: Vec<Frame>) {
        debug!("replacing {} frames with {}", self.frames.len(), frames.len());
        self.frames = frames;
        self.current_frame = if self.frames.is_empty() { None } else { Some(0) };
        self.selection = None;
    }

    /// Appends frames after the existing ones.
    ///
    /// The current frame and selection are kept unless the scene was empty.
    pub fn append_frames(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.frames.extend(frames);
        if self.current_frame.is_none() && !self.frames.is_empty() {
            self.current_frame = Some(0);
        }
    }

    /// Removes all frames.
    pub fn clear_frames(&mut self) {
        self.replace_frames(Vec::new());
    }

    /// All frames in order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the current frame, `None` when there are no frames.
    #[must_use]
    pub fn current_frame_index(&self) -> Option<usize> {
        self.current_frame
    }

    /// The current frame.
    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current_frame.and_then(|i| self.frames.get(i))
    }

    /// Primitives of the current frame (empty without frames).
    #[must_use]
    pub fn current_primitives(&self) -> &[Primitive] {
        self.current_frame()
            .map(|frame| frame.primitives.as_slice())
            .unwrap_or_default()
    }

    /// Makes `index` (clamped to the valid range) the current frame and
    /// clears the selection. Does nothing without frames.
    pub fn set_current_frame(&mut self, index: usize) {
        let Some(last) = self.frames.len().checked_sub(1) else {
            return;
        };
        self.current_frame = Some(index.min(last));
        self.selection = None;
    }

    /// Moves the current frame by `delta`, clamped, and clears the selection.
    ///
    /// Returns the new current frame index.
    pub fn step_frame(&mut self, delta: isize) -> Option<usize> {
        let current = self.current_frame?;
        self.set_current_frame(current.saturating_add_signed(delta));
        self.current_frame
    }

    // === Selection ===

    /// The selected primitive index within the current frame.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// The selected primitive.
    #[must_use]
    pub fn selected_primitive(&self) -> Option<&Primitive> {
        self.selection
            .and_then(|i| self.current_primitives().get(i))
    }

    /// Sets or clears the selection.
    ///
    /// Returns `Ok(false)` if the selection was already `selection`. A change
    /// marks that the primitive list owes a scroll to the new selection.
    ///
    /// # Errors
    ///
    /// Returns [`FramescopeError::SelectionOutOfRange`] if the index is not a
    /// primitive of the current frame; the selection is left unchanged.
    pub fn set_selection(&mut self, selection: Option<usize>) -> Result<bool> {
        if selection == self.selection {
            return Ok(false);
        }
        if let Some(index) = selection {
            let len = self.current_primitives().len();
            if index >= len {
                return Err(FramescopeError::SelectionOutOfRange { index, len });
            }
        }
        self.selection = selection;
        self.scroll_to_selection = true;
        Ok(true)
    }

    /// Returns and clears the pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_selection)
    }

    // === Overlay ===

    /// Replaces the whole overlay with `mesh`.
    pub fn replace_overlay(&mut self, mesh: Primitive) {
        self.overlay.clear();
        self.overlay.push(mesh);
        self.overlay_generation += 1;
    }

    /// Adds a non-mesh overlay primitive next to the existing overlay.
    pub fn add_overlay_primitive(&mut self, primitive: Primitive) {
        self.overlay.push(primitive);
        self.overlay_generation += 1;
    }

    /// Removes every overlay primitive.
    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
        self.overlay_generation += 1;
    }

    /// Overlay primitives, shown on every frame.
    #[must_use]
    pub fn overlay(&self) -> &[Primitive] {
        &self.overlay
    }

    /// Incremented on every overlay change; GPU caches compare against it.
    #[must_use]
    pub fn overlay_generation(&self) -> u64 {
        self.overlay_generation
    }

    // === View fitting ===

    /// Asks for the view to be refitted on the next opportunity.
    pub fn request_fit(&mut self) {
        self.fit_requested = true;
    }

    /// Returns and clears the pending fit request.
    pub fn consume_fit_request(&mut self) -> bool {
        std::mem::take(&mut self.fit_requested)
    }

    /// Every vertex position of the current frame and of the overlay.
    pub fn visible_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.current_primitives()
            .iter()
            .chain(&self.overlay)
            .flat_map(Primitive::positions)
    }
}
