//! Legend color mapping.
//!
//! Data values are mapped through the style's log/scale/offset transform
//! into a fixed-size legend lookup table; the resulting class index
//! drives symbol, disc and vector coloring.

use wms_common::{Color, StyleConfiguration};

/// Number of entries in the legend lookup table.
pub const LEGEND_SIZE: usize = 240;

/// Fallback gradient when a style defines no color stops.
const DEFAULT_STOPS: &[(f64, Color)] = &[
    (0.0, Color::rgb(0, 0, 160)),
    (80.0, Color::rgb(0, 220, 220)),
    (160.0, Color::rgb(255, 255, 0)),
    (239.0, Color::rgb(200, 0, 0)),
];

/// A resolved legend color table.
#[derive(Debug, Clone)]
pub struct LegendTable {
    colors: Vec<Color>,
}

impl LegendTable {
    /// Build the table from a style's color stops, interpolating
    /// linearly between stop indices. Styles without stops get a default
    /// ramp.
    pub fn from_style(style: &StyleConfiguration) -> Self {
        let mut stops: Vec<(f64, Color)> = style
            .color_stops
            .iter()
            .filter_map(|s| Color::from_hex(&s.color).map(|c| (s.index, c)))
            .collect();
        if stops.len() < 2 {
            stops = DEFAULT_STOPS.to_vec();
        }
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut colors = Vec::with_capacity(LEGEND_SIZE);
        for i in 0..LEGEND_SIZE {
            let position = i as f64;
            let color = if position <= stops[0].0 {
                stops[0].1
            } else if position >= stops[stops.len() - 1].0 {
                stops[stops.len() - 1].1
            } else {
                let upper = stops.iter().position(|s| s.0 >= position).unwrap();
                let (low_pos, low_color) = stops[upper - 1];
                let (high_pos, high_color) = stops[upper];
                let t = (position - low_pos) / (high_pos - low_pos);
                low_color.lerp(&high_color, t)
            };
            colors.push(color);
        }
        Self { colors }
    }

    /// Color at a legend index, clamped to the table.
    pub fn color(&self, index: usize) -> Color {
        self.colors[index.min(LEGEND_SIZE - 1)]
    }
}

/// Map a data value to its legend class index.
///
/// Applies the optional log transform, then scale and offset, clamping
/// into the table. Non-finite values land on index 0.
pub fn pixel_index_for_value(style: &StyleConfiguration, value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let mut v = value;
    if style.legend_log > 1.0 {
        v = if v > 0.0 {
            v.log10() / style.legend_log.log10()
        } else {
            0.0
        };
    }
    v = v * style.legend_scale + style.legend_offset;
    v.round().clamp(0.0, (LEGEND_SIZE - 1) as f64) as usize
}

/// Map a data value to its legend color.
pub fn pixel_color_for_value(
    table: &LegendTable,
    style: &StyleConfiguration,
    value: f64,
) -> Color {
    table.color(pixel_index_for_value(style, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_clamps_to_table() {
        let style = StyleConfiguration {
            legend_scale: 2.0,
            legend_offset: 30.0,
            ..Default::default()
        };
        assert_eq!(pixel_index_for_value(&style, -500.0), 0);
        assert_eq!(pixel_index_for_value(&style, 10.0), 50);
        assert_eq!(pixel_index_for_value(&style, 10_000.0), LEGEND_SIZE - 1);
        assert_eq!(pixel_index_for_value(&style, f64::NAN), 0);
    }

    #[test]
    fn test_log_legend() {
        let style = StyleConfiguration {
            legend_log: 10.0,
            legend_scale: 100.0,
            ..Default::default()
        };
        // log10(100)/log10(10) * 100 = 200
        assert_eq!(pixel_index_for_value(&style, 100.0), 200);
        // Non-positive values cannot be log-transformed.
        assert_eq!(pixel_index_for_value(&style, -1.0), 0);
    }

    #[test]
    fn test_default_table_spans_ramp() {
        let table = LegendTable::from_style(&StyleConfiguration::default());
        assert_eq!(table.color(0), Color::rgb(0, 0, 160));
        assert_eq!(table.color(239), Color::rgb(200, 0, 0));
        assert_eq!(table.color(10_000), Color::rgb(200, 0, 0));
        // Midpoints are interpolated, not stepped.
        let mid = table.color(40);
        assert!(mid.g > 0 && mid.b > 150);
    }
}
