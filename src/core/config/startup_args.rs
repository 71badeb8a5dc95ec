//=========================================================================
// Startup Argument Vector
//=========================================================================
//
// Positional arguments handed once to the native engine at construction.
//
// Wire order (fixed contract with the native side):
//
//   0 canvasId   1 mapId    2 width     3 height    4 apiKey
//   5 centerLat  6 centerLng  7 distance  8 indoorsEnabledFlag
//
// Reordering, adding or removing a field requires a paired change on the
// engine side. The indoors flag is the literal "1" or "0". Numbers are
// rendered the way the engine's host number-to-string conversion does.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::dpi::PhysicalSize;

//=== Internal Dependencies ===============================================

use super::options::LatLng;

/// Number of entries in the startup argument vector.
pub const STARTUP_ARG_COUNT: usize = 9;

//=== StartupArgs =========================================================

/// Typed view of the startup argument vector.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupArgs {
    pub canvas_id: String,
    pub map_id: u32,
    pub size: PhysicalSize<u32>,
    pub api_key: String,
    pub center: LatLng,
    pub distance: f64,
    pub indoors_enabled: bool,
}

impl StartupArgs {
    /// Serializes to the positional string vector the engine expects.
    ///
    /// Numbers use the shortest round-trip rendering, so whole values
    /// carry no fractional part (`10.0` becomes `"10"`). See
    /// [`format_number`] for zero, tiny and huge magnitudes.
    pub fn to_argv(&self) -> Vec<String> {
        let flag = if self.indoors_enabled { "1" } else { "0" };

        vec![
            self.canvas_id.clone(),
            self.map_id.to_string(),
            self.size.width.to_string(),
            self.size.height.to_string(),
            self.api_key.clone(),
            format_number(self.center.lat),
            format_number(self.center.lng),
            format_number(self.distance),
            flag.to_string(),
        ]
    }
}

/// Renders `value` in the engine's numeric text form.
///
/// Negative zero prints as `"0"`. Magnitudes below `1e-6` or at least
/// `1e21` switch to exponent notation with an explicit exponent sign
/// (`1e-7`, `1.5e+21`); everything else is plain decimal.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
