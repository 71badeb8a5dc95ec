//=========================================================================
// Map Options
//=========================================================================
//
// Caller options merged over documented defaults.
//
// Flow:
//   host JSON ──from_json()──> MapOptionsOverrides
//                                   │
//   MapOptions::default() ──merged()┴──> MapOptions
//
// Keys present in the overrides always win. Keys absent keep defaults.
// Unknown keys are ignored so a host can pass its full UI option bag.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigurationError;

//=== Defaults ============================================================

pub const DEFAULT_CANVAS_ID: &str = "canvas";
pub const DEFAULT_ZOOM: f64 = 12.0;
pub const DEFAULT_CENTER: LatLng = LatLng { lat: 37.7858, lng: -122.401 };

//=== LatLng ==============================================================

/// Geographic position in degrees.
///
/// Deserializes from either `[lat, lng]` or `{"lat": .., "lng": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "LatLngRepr")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LatLngRepr {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<LatLngRepr> for LatLng {
    fn from(repr: LatLngRepr) -> Self {
        match repr {
            LatLngRepr::Pair(pair) => pair.into(),
            LatLngRepr::Object { lat, lng } => Self { lat, lng },
        }
    }
}

//=== MapOptionsOverrides =================================================

/// Partial options as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptionsOverrides {
    pub canvas_id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub indoors_enabled: Option<bool>,
    pub display_entrance_markers: Option<bool>,
    pub center: Option<LatLng>,
    pub zoom: Option<f64>,
    pub zoom_control: Option<bool>,
}

impl MapOptionsOverrides {
    /// Parses a host-supplied JSON options object.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }
}

//=== MapOptions ==========================================================

/// Fully resolved controller configuration.
///
/// # Default Values
///
/// - **canvasId**: `"canvas"`
/// - **width / height**: unset (derived from the container)
/// - **indoorsEnabled**: `false`
/// - **displayEntranceMarkers**: `true`
/// - **center**: `37.7858, -122.401`
/// - **zoom**: `12`
/// - **zoomControl**: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub canvas_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub indoors_enabled: bool,
    pub display_entrance_markers: bool,
    pub center: LatLng,
    pub zoom: f64,
    pub zoom_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            width: None,
            height: None,
            indoors_enabled: false,
            display_entrance_markers: true,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            zoom_control: false,
        }
    }
}

impl MapOptions {
    //--- Merge ------------------------------------------------------------

    /// Applies every key present in `overrides` on top of `self`.
    pub fn merged(mut self, overrides: MapOptionsOverrides) -> Self {
        let MapOptionsOverrides {
            canvas_id,
            width,
            height,
            indoors_enabled,
            display_entrance_markers,
            center,
            zoom,
            zoom_control,
        } = overrides;

        if let Some(v) = canvas_id {
            self.canvas_id = v;
        }
        if width.is_some() {
            self.width = width;
        }
        if height.is_some() {
            self.height = height;
        }
        if let Some(v) = indoors_enabled {
            self.indoors_enabled = v;
        }
        if let Some(v) = display_entrance_markers {
            self.display_entrance_markers = v;
        }
        if let Some(v) = center {
            self.center = v;
        }
        if let Some(v) = zoom {
            self.zoom = v;
        }
        if let Some(v) = zoom_control {
            self.zoom_control = v;
        }
        self
    }

    /// Rejects values no engine can be started with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.zoom.is_finite() {
            return Err(ConfigurationError::InvalidZoom(self.zoom));
        }
        Ok(())
    }

    //--- Fluent Setters ---------------------------------------------------

    pub fn with_canvas_id(mut self, canvas_id: impl Into<String>) -> Self {
        self.canvas_id = canvas_id.into();
        self
    }

    /// Pins the surface to an explicit pixel size instead of the
    /// container's layout size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_indoors(mut self, enabled: bool) -> Self {
        self.indoors_enabled = enabled;
        self
    }

    pub fn with_entrance_markers(mut self, display: bool) -> Self {
        self.display_entrance_markers = display;
        self
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = center;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_zoom_control(mut self, visible: bool) -> Self {
        self.zoom_control = visible;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let options = MapOptions::default();
        assert_eq!(options.canvas_id, "canvas");
        assert_eq!(options.width, None);
        assert_eq!(options.height, None);
        assert!(!options.indoors_enabled);
        assert!(options.display_entrance_markers);
        assert_eq!(options.center, LatLng::new(37.7858, -122.401));
        assert_eq!(options.zoom, 12.0);
        assert!(!options.zoom_control);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let merged = MapOptions::default().merged(MapOptionsOverrides::default());
        assert_eq!(merged, MapOptions::default());
    }

    #[test]
    fn present_keys_win() {
        let overrides = MapOptionsOverrides {
            center: Some(LatLng::new(10.0, 20.0)),
            zoom: Some(14.0),
            indoors_enabled: Some(true),
            display_entrance_markers: Some(false),
            ..Default::default()
        };

        let merged = MapOptions::default().merged(overrides);

        assert_eq!(merged.center, LatLng::new(10.0, 20.0));
        assert_eq!(merged.zoom, 14.0);
        assert!(merged.indoors_enabled);
        assert!(!merged.display_entrance_markers);
        // Untouched keys
        assert_eq!(merged.canvas_id, "canvas");
        assert_eq!(merged.width, None);
        assert!(!merged.zoom_control);
    }

    #[test]
    fn every_key_can_be_overridden() {
        let overrides = MapOptionsOverrides {
            canvas_id: Some("map-surface".into()),
            width: Some(640),
            height: Some(480),
            indoors_enabled: Some(true),
            display_entrance_markers: Some(false),
            center: Some(LatLng::new(-1.0, 2.0)),
            zoom: Some(3.5),
            zoom_control: Some(true),
        };

        let expected = MapOptions::default()
            .with_canvas_id("map-surface")
            .with_size(640, 480)
            .with_indoors(true)
            .with_entrance_markers(false)
            .with_center(LatLng::new(-1.0, 2.0))
            .with_zoom(3.5)
            .with_zoom_control(true);

        assert_eq!(MapOptions::default().merged(overrides), expected);
    }

    #[test]
    fn parses_camel_case_json_with_pair_center() {
        let overrides = MapOptionsOverrides::from_json(
            r#"{"center": [10, 20], "zoom": 14, "indoorsEnabled": true}"#,
        )
        .unwrap();

        assert_eq!(overrides.center, Some(LatLng::new(10.0, 20.0)));
        assert_eq!(overrides.zoom, Some(14.0));
        assert_eq!(overrides.indoors_enabled, Some(true));
        assert_eq!(overrides.canvas_id, None);
    }

    #[test]
    fn parses_object_center_and_ignores_unknown_keys() {
        let overrides = MapOptionsOverrides::from_json(
            r#"{"center": {"lat": 51.5, "lng": -0.12}, "canvasId": "c2", "attributionControl": false}"#,
        )
        .unwrap();

        assert_eq!(overrides.center, Some(LatLng::new(51.5, -0.12)));
        assert_eq!(overrides.canvas_id.as_deref(), Some("c2"));
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = MapOptionsOverrides::from_json(r#"{"zoom": "high"}"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOptions(_)));
    }

    #[test]
    fn validate_rejects_non_finite_zoom() {
        let options = MapOptions::default().with_zoom(f64::NAN);
        assert!(matches!(options.validate(), Err(ConfigurationError::InvalidZoom(_))));
        assert!(MapOptions::default().validate().is_ok());
    }
}
