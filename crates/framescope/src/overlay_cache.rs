//! Render-side cache for data derived from the overlay.
//!
//! Renderers upload the overlay mesh once and reuse the buffers until the
//! scene reports a new overlay generation.

use framescope_core::{Primitive, SceneModel};

/// A value built from the overlay, rebuilt whenever the overlay changes.
#[derive(Debug)]
pub struct OverlayCache<T> {
    generation: Option<u64>,
    value: Option<T>,
}

impl<T> Default for OverlayCache<T> {
    fn default() -> Self {
        Self {
            generation: None,
            value: None,
        }
    }
}

impl<T> OverlayCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, calling `build` first if the overlay
    /// changed since the last call.
    ///
    /// Returns `None` (and drops any old value) while the overlay is empty.
    pub fn get_or_build(
        &mut self,
        scene: &SceneModel,
        build: impl FnOnce(&[Primitive]) -> T,
    ) -> Option<&T> {
        let generation = scene.overlay_generation();
        if self.generation != Some(generation) {
            self.generation = Some(generation);
            let overlay = scene.overlay();
            self.value = if overlay.is_empty() {
                None
            } else {
                log::debug!("rebuilding overlay cache for generation {generation}");
                Some(build(overlay))
            };
        }
        self.value.as_ref()
    }

    /// Forgets the cached value so the next call rebuilds it.
    pub fn invalidate(&mut self) {
        self.generation = None;
        self.value = None;
    }

    /// The generation the cached value was built for.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}
