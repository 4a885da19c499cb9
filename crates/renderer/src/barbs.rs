//! Meteorological wind barb glyph geometry.
//!
//! Barbs are composed procedurally: a shaft pointing toward the
//! direction the wind comes from, with half barbs (5 kt), full barbs
//! (10 kt) and pennants (50 kt) attached from the outer end inward.
//! Calm winds (below 2.5 kt after rounding) render as a circle.

use std::f64::consts::PI;

/// Conversion factor from m/s to knots.
pub const MS_TO_KNOTS: f64 = 1.94384;

/// Convert u/v wind components (m/s) to speed (m/s) and meteorological
/// direction: radians FROM which the wind blows, 0 = north, clockwise.
pub fn uv_to_speed_direction(u: f64, v: f64) -> (f64, f64) {
    let speed = u.hypot(v);
    let mut direction = (-u).atan2(-v);
    if direction < 0.0 {
        direction += 2.0 * PI;
    }
    (speed, direction)
}

/// Glyph components in pixel coordinates relative to the station
/// location, with screen Y running downward.
#[derive(Debug, Clone, Default)]
pub struct BarbGlyph {
    /// Line segments: shaft plus half/full barbs.
    pub segments: Vec<[(f32, f32); 2]>,
    /// Filled triangles for the 50 kt pennants.
    pub pennants: Vec<[(f32, f32); 3]>,
    /// Radius of the calm circle; present only for calm winds.
    pub calm_radius: Option<f32>,
}

/// Component counts after rounding to the nearest 5 kt:
/// (pennants, full barbs, half barbs).
pub fn barb_counts(speed_knots: f64) -> (usize, usize, usize) {
    let rounded = (((speed_knots + 2.5) / 5.0).floor() * 5.0).max(0.0) as usize;
    let pennants = rounded / 50;
    let remainder = rounded % 50;
    (pennants, remainder / 10, (remainder % 10) / 5)
}

/// Build the barb glyph for a wind observation.
///
/// `direction_from` is the meteorological direction in radians (0 =
/// north, clockwise); `shaft_length` the shaft length in pixels.
pub fn barb_glyph(speed_knots: f64, direction_from: f64, shaft_length: f32) -> BarbGlyph {
    let (pennants, fulls, halves) = barb_counts(speed_knots);
    if pennants == 0 && fulls == 0 && halves == 0 {
        return BarbGlyph {
            calm_radius: Some((shaft_length * 0.15).max(2.0)),
            ..Default::default()
        };
    }

    // Unit vector pointing from the station toward where the wind comes
    // from, in screen coordinates.
    let ux = direction_from.sin() as f32;
    let uy = -direction_from.cos() as f32;
    // Feather vector: barbs sweep back from the shaft at ~120 degrees,
    // on the clockwise side.
    let angle = direction_from + 2.0 * PI / 3.0;
    let fx = angle.sin() as f32;
    let fy = -angle.cos() as f32;

    let full_length = shaft_length * 0.4;
    let spacing = shaft_length * 0.15;

    let mut glyph = BarbGlyph::default();
    glyph
        .segments
        .push([(0.0, 0.0), (ux * shaft_length, uy * shaft_length)]);

    // Attach components from the shaft tip inward.
    let mut offset = shaft_length;
    for _ in 0..pennants {
        let tip = (ux * offset, uy * offset);
        let base = (ux * (offset - spacing), uy * (offset - spacing));
        let flag = (
            ux * offset + fx * full_length,
            uy * offset + fy * full_length,
        );
        glyph.pennants.push([tip, base, flag]);
        offset -= spacing * 1.5;
    }
    for _ in 0..fulls {
        let root = (ux * offset, uy * offset);
        let tip = (
            ux * offset + fx * full_length,
            uy * offset + fy * full_length,
        );
        glyph.segments.push([root, tip]);
        offset -= spacing;
    }
    for _ in 0..halves {
        // A lone half barb sits one spacing in from the tip.
        if pennants == 0 && fulls == 0 {
            offset -= spacing;
        }
        let root = (ux * offset, uy * offset);
        let tip = (
            ux * offset + fx * full_length * 0.5,
            uy * offset + fy * full_length * 0.5,
        );
        glyph.segments.push([root, tip]);
        offset -= spacing;
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_to_speed_direction() {
        // Wind from the north: u = 0, v < 0.
        let (speed, direction) = uv_to_speed_direction(0.0, -10.0);
        assert!((speed - 10.0).abs() < 1e-9);
        assert!(direction.abs() < 1e-9);

        // Wind from the west: u > 0, v = 0.
        let (_, direction) = uv_to_speed_direction(10.0, 0.0);
        assert!((direction - 1.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_barb_counts() {
        assert_eq!(barb_counts(0.0), (0, 0, 0));
        assert_eq!(barb_counts(2.0), (0, 0, 0));
        assert_eq!(barb_counts(5.0), (0, 0, 1));
        assert_eq!(barb_counts(10.0), (0, 1, 0));
        assert_eq!(barb_counts(15.0), (0, 1, 1));
        assert_eq!(barb_counts(50.0), (1, 0, 0));
        assert_eq!(barb_counts(65.0), (1, 1, 1));
        // Rounding to the nearest 5 kt.
        assert_eq!(barb_counts(12.4), (0, 1, 0));
        assert_eq!(barb_counts(12.6), (0, 1, 1));
    }

    #[test]
    fn test_calm_glyph() {
        let glyph = barb_glyph(1.0, 0.0, 20.0);
        assert!(glyph.segments.is_empty());
        assert!(glyph.calm_radius.is_some());
    }

    #[test]
    fn test_glyph_component_totals() {
        // 65 kt: shaft + 1 full + 1 half = 3 segments, 1 pennant.
        let glyph = barb_glyph(65.0, 1.0, 20.0);
        assert_eq!(glyph.segments.len(), 3);
        assert_eq!(glyph.pennants.len(), 1);
        assert!(glyph.calm_radius.is_none());
    }

    #[test]
    fn test_shaft_points_windward() {
        // Wind from the east: the shaft extends east (+x on screen).
        let glyph = barb_glyph(10.0, PI / 2.0, 20.0);
        let [start, end] = glyph.segments[0];
        assert_eq!(start, (0.0, 0.0));
        assert!(end.0 > 19.0);
        assert!(end.1.abs() < 1e-4);
    }
}
