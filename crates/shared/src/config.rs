//! Tunable constants and the serde-loadable configuration built from them.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Smallest zoom the camera may reach. Strictly positive so screen/world
/// conversion never divides by zero.
pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom applied when a map is (re)centered.
pub const DEFAULT_ZOOM: f64 = 0.125;

/// Per-frame blend factor for the pan animation.
pub const PAN_BLEND: f64 = 0.5;
/// Per-frame blend factor for the zoom animation. Lower than the pan blend so
/// zoom eases in more slowly.
pub const ZOOM_BLEND: f64 = 0.25;

/// Ceiling for fit-two-points so near-coincident points don't over-zoom.
pub const FIT_MAX_ZOOM: f64 = 2.0;
/// Padding in world units around each point when fitting the guess and the answer.
pub const FIT_PADDING: f64 = 100.0;

/// Wheel zoom factor is `exp(-delta_y * WHEEL_SENSITIVITY)`.
pub const WHEEL_SENSITIVITY: f64 = 0.001;

/// On-screen width of the guess-to-answer line in CSS pixels.
pub const RESULT_LINE_WIDTH: f64 = 10.0;
pub const RESULT_LINE_COLOR: &str = "red";
/// Marker sprites are drawn at this fraction of their natural size.
pub const MARKER_SCALE: f64 = 0.5;

/// Zoom used to center the answer when the round ends without a guess.
pub const RESULT_FOCUS_ZOOM: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub default_zoom: f64,
    pub pan_blend: f64,
    pub zoom_blend: f64,
    pub fit_max_zoom: f64,
    pub fit_padding: f64,
    pub wheel_sensitivity: f64,
    pub result_focus_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            default_zoom: DEFAULT_ZOOM,
            pan_blend: PAN_BLEND,
            zoom_blend: ZOOM_BLEND,
            fit_max_zoom: FIT_MAX_ZOOM,
            fit_padding: FIT_PADDING,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            result_focus_zoom: RESULT_FOCUS_ZOOM,
        }
    }
}

impl CameraConfig {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.zoom_min > 0.0 && self.zoom_min.is_finite()) {
            return Err(MapError::InvalidConfig(format!(
                "zoomMin must be positive and finite, got {}",
                self.zoom_min
            )));
        }
        if !(self.zoom_max >= self.zoom_min && self.zoom_max.is_finite()) {
            return Err(MapError::InvalidConfig(format!(
                "zoomMax ({}) must be finite and at least zoomMin ({})",
                self.zoom_max, self.zoom_min
            )));
        }
        for (name, blend) in [("panBlend", self.pan_blend), ("zoomBlend", self.zoom_blend)] {
            if !(blend > 0.0 && blend <= 1.0) {
                return Err(MapError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {blend}"
                )));
            }
        }
        if !(self.fit_max_zoom > 0.0) || self.fit_padding < 0.0 {
            return Err(MapError::InvalidConfig(
                "fitMaxZoom must be positive and fitPadding non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub result_line_width: f64,
    pub result_line_color: String,
    pub marker_scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            result_line_width: RESULT_LINE_WIDTH,
            result_line_color: RESULT_LINE_COLOR.to_string(),
            marker_scale: MARKER_SCALE,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.result_line_width > 0.0) || !(self.marker_scale > 0.0) {
            return Err(MapError::InvalidConfig(
                "resultLineWidth and markerScale must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl MapConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.camera.validate()?;
        config.render.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MapConfig::default();
        assert!(config.camera.validate().is_ok());
        assert!(config.render.validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = MapConfig::from_json("{}").unwrap();
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_single_field() {
        let config = MapConfig::from_json(r#"{"camera": {"fitMaxZoom": 3.5}}"#).unwrap();
        assert!((config.camera.fit_max_zoom - 3.5).abs() < 1e-9);
        assert!((config.camera.zoom_min - ZOOM_MIN).abs() < 1e-9);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_zero_zoom_min_rejected() {
        let err = MapConfig::from_json(r#"{"camera": {"zoomMin": 0.0}}"#).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let err = MapConfig::from_json(r#"{"camera": {"zoomMin": 2.0, "zoomMax": 1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
    }

    #[test]
    fn test_blend_out_of_range_rejected() {
        let err = MapConfig::from_json(r#"{"camera": {"zoomBlend": 1.5}}"#).unwrap_err();
        assert!(err.to_string().contains("zoomBlend"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = MapConfig::from_json("{camera").unwrap_err();
        assert!(matches!(err, MapError::ConfigParse(_)));
    }

    #[test]
    fn test_clamp_zoom_bounds() {
        let camera = CameraConfig::default();
        assert!((camera.clamp_zoom(0.0) - ZOOM_MIN).abs() < 1e-12);
        assert!((camera.clamp_zoom(100.0) - ZOOM_MAX).abs() < 1e-12);
        assert!((camera.clamp_zoom(1.0) - 1.0).abs() < 1e-12);
    }
}
