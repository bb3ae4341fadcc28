//! Configuration options for framescope.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global configuration options.
///
/// Every field has a default, so a JSON file only needs to mention the
/// values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Scene protocol parser behavior.
    pub parser: ParserOptions,

    /// Picking tolerances.
    pub pick: PickOptions,

    /// View fitting constants.
    pub fit: FitOptions,
}

impl Options {
    /// Parses options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What to do with a `framestart(` that is still open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedFramePolicy {
    /// Keep the partial frame.
    #[default]
    Append,
    /// Discard the partial frame.
    Drop,
}

/// Options for the scene protocol parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// End-of-stream handling for an unclosed frame.
    pub unterminated_frame: UnterminatedFramePolicy,
}

/// Options for ray picking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    /// Screen-space tolerance for lines and points, in pixels.
    pub tolerance_px: f32,

    /// Vertical field of view assumed when converting pixels to world units.
    pub fov_y_degrees: f32,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            tolerance_px: 6.0,
            fov_y_degrees: 45.0,
        }
    }
}

/// Options for fitting the view to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Lower bound on the bounding-sphere radius.
    pub min_radius: f32,

    /// Near clipping plane after a fit (never below 0.1).
    pub near_plane: f32,

    /// Far plane is placed this many radii beyond the camera distance.
    pub far_padding: f32,

    /// Camera distance in radii.
    pub distance_factor: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_radius: 1.0,
            near_plane: 0.1,
            far_padding: 1.5,
            distance_factor: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(
            options.parser.unterminated_frame,
            UnterminatedFramePolicy::Append
        );
        assert!((options.pick.tolerance_px - 6.0).abs() < f32::EPSILON);
        assert!((options.pick.fov_y_degrees - 45.0).abs() < f32::EPSILON);
        assert!((options.fit.min_radius - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            Options::from_json_str(r#"{ "parser": { "unterminated_frame": "drop" } }"#).unwrap();
        assert_eq!(
            options.parser.unterminated_frame,
            UnterminatedFramePolicy::Drop
        );
        assert_eq!(options.pick, PickOptions::default());
        assert_eq!(options.fit, FitOptions::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut options = Options::default();
        options.pick.tolerance_px = 10.0;
        let json = options.to_json_string().unwrap();
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Options::from_json_str("{ not json"),
            Err(crate::FramescopeError::JsonError(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            Options::load("/nonexistent/framescope-options.json"),
            Err(crate::FramescopeError::IoError(_))
        ));
    }
}
