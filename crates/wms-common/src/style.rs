//! Style configuration for rendering.
//!
//! A [`StyleDefinition`] is the serde-parsed style section of the layer
//! configuration. Resolving it produces an immutable
//! [`StyleConfiguration`] with defaults applied, plus a list of warnings
//! for tokens that were ignored. Callers inspect the returned
//! [`StyleResolution`] instead of querying mutable error flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Composable render-method flags.
///
/// Multiple flags may combine, e.g. `point|vector` for labelled stations
/// with wind arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderMethod(u32);

impl RenderMethod {
    pub const UNDEFINED: RenderMethod = RenderMethod(0);
    pub const NEAREST: RenderMethod = RenderMethod(1);
    pub const BILINEAR: RenderMethod = RenderMethod(2);
    pub const SHADED: RenderMethod = RenderMethod(4);
    pub const CONTOUR: RenderMethod = RenderMethod(8);
    pub const POINT: RenderMethod = RenderMethod(16);
    pub const VECTOR: RenderMethod = RenderMethod(32);
    pub const BARB: RenderMethod = RenderMethod(64);
    pub const THIN: RenderMethod = RenderMethod(256);
    pub const RGBA: RenderMethod = RenderMethod(512);
    pub const VOLUME: RenderMethod = RenderMethod(1024);

    /// Token table mapping style-configuration words to flags.
    const TOKENS: &'static [(&'static str, RenderMethod)] = &[
        ("nearest", RenderMethod::NEAREST),
        ("bilinear", RenderMethod::BILINEAR),
        ("shaded", RenderMethod::SHADED),
        ("contour", RenderMethod::CONTOUR),
        ("point", RenderMethod::POINT),
        ("vector", RenderMethod::VECTOR),
        ("barb", RenderMethod::BARB),
        ("thin", RenderMethod::THIN),
        ("rgba", RenderMethod::RGBA),
        ("volume", RenderMethod::VOLUME),
    ];

    pub fn contains(self, other: RenderMethod) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse a space/comma-separated token list into a flag set.
    ///
    /// Unknown tokens are ignored with a warning so older configurations
    /// keep working against newer servers; the unknown tokens are also
    /// returned for the caller's diagnostics.
    pub fn from_token_list(tokens: &str) -> (RenderMethod, Vec<String>) {
        let mut method = RenderMethod::UNDEFINED;
        let mut unknown = Vec::new();
        for token in tokens.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let lowered = token.to_ascii_lowercase();
            match Self::TOKENS.iter().find(|(name, _)| *name == lowered) {
                Some((_, flag)) => method = method | *flag,
                None => {
                    warn!(token, "ignoring unknown render method token");
                    unknown.push(token.to_string());
                }
            }
        }
        (method, unknown)
    }

    /// Render the flag set back to a space-separated token list.
    pub fn to_token_list(self) -> String {
        let mut tokens = Vec::new();
        for (name, flag) in Self::TOKENS {
            if self.contains(*flag) {
                tokens.push(*name);
            }
        }
        tokens.join(" ")
    }
}

impl std::ops::BitOr for RenderMethod {
    type Output = RenderMethod;
    fn bitor(self, rhs: RenderMethod) -> RenderMethod {
        RenderMethod(self.0 | rhs.0)
    }
}

impl fmt::Display for RenderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token_list())
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            6 => Some(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: 255,
            }),
            8 => Some(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => None,
        }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// A color stop on the legend gradient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStop {
    /// Legend index position of this stop, 0..240.
    pub index: f64,
    /// Hex color string, e.g. `"#0000FF"`.
    pub color: String,
}

/// A rule mapping a data value range to a glyph for point rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInterval {
    /// Minimum value (inclusive); absent means unbounded below.
    #[serde(default)]
    pub min: Option<f64>,
    /// Maximum value (exclusive); absent means unbounded above.
    #[serde(default)]
    pub max: Option<f64>,
    /// Glyph to draw, either a single character or a symbol file path.
    pub symbol: String,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

impl SymbolInterval {
    pub fn matches(&self, value: f64) -> bool {
        let above_min = self.min.map(|m| value >= m).unwrap_or(true);
        let below_max = self.max.map(|m| value < m).unwrap_or(true);
        above_min && below_max
    }
}

/// Legend scaling parameters of a style definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegendDefinition {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub offset: Option<f64>,
    /// Log base for a logarithmic legend; 0 or absent disables it.
    #[serde(default)]
    pub log: Option<f64>,
    #[serde(default)]
    pub tick_interval: Option<f64>,
    #[serde(default)]
    pub tick_round: Option<f64>,
    /// Fix the legend classes instead of deriving them from data.
    #[serde(default)]
    pub fixed_min_max: Option<bool>,
}

/// Serde-parsed style section as it appears in the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Render-method token list, e.g. `"point thin"`.
    #[serde(default)]
    pub render_method: Option<String>,
    #[serde(default)]
    pub shade_interval: Option<f64>,
    #[serde(default)]
    pub contour_interval_low: Option<f64>,
    #[serde(default)]
    pub contour_interval_high: Option<f64>,
    #[serde(default)]
    pub legend: Option<LegendDefinition>,
    /// Values outside this range are not drawn.
    #[serde(default)]
    pub value_range: Option<[f64; 2]>,
    #[serde(default)]
    pub smoothing_filter: Option<u32>,
    #[serde(default)]
    pub symbol_intervals: Vec<SymbolInterval>,
    #[serde(default)]
    pub color_stops: Vec<ColorStop>,
}

impl StyleDefinition {
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::Parse(e.to_string()))
    }
}

/// A resolved, validated set of rendering parameters.
///
/// Immutable after construction; created once per style resolution
/// request and read-only thereafter by renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfiguration {
    pub style_name: String,
    pub style_title: String,
    pub style_abstract: String,
    pub render_method: RenderMethod,
    pub shade_interval: f64,
    pub contour_interval_low: f64,
    pub contour_interval_high: f64,
    pub legend_scale: f64,
    pub legend_offset: f64,
    /// Log base for the legend transform; 0 means disabled.
    pub legend_log: f64,
    /// 0 means ticks are chosen automatically.
    pub legend_tick_interval: f64,
    pub legend_tick_round: f64,
    pub legend_value_range: Option<(f64, f64)>,
    pub legend_fixed_min_max: bool,
    pub smoothing_filter: u32,
    /// Ordered symbol rules; first match wins.
    pub symbol_intervals: Vec<SymbolInterval>,
    pub color_stops: Vec<ColorStop>,
}

impl Default for StyleConfiguration {
    fn default() -> Self {
        Self {
            style_name: String::new(),
            style_title: String::new(),
            style_abstract: String::new(),
            render_method: RenderMethod::UNDEFINED,
            shade_interval: 0.0,
            contour_interval_low: 0.0,
            contour_interval_high: 0.0,
            legend_scale: 1.0,
            legend_offset: 0.0,
            legend_log: 0.0,
            legend_tick_interval: 0.0,
            legend_tick_round: 0.0,
            legend_value_range: None,
            legend_fixed_min_max: false,
            smoothing_filter: 0,
            symbol_intervals: Vec::new(),
            color_stops: Vec::new(),
        }
    }
}

/// Outcome of style resolution: the configuration plus anything that was
/// ignored along the way.
#[derive(Debug, Clone)]
pub struct StyleResolution {
    pub configuration: StyleConfiguration,
    pub warnings: Vec<String>,
}

impl StyleConfiguration {
    /// Resolve a parsed style definition into a render-ready
    /// configuration, applying defaults for absent fields.
    ///
    /// Unknown render-method tokens are collected as warnings; malformed
    /// required fields (an inverted value range, a non-positive shade
    /// interval) are errors so the caller can decide whether to render
    /// with a default style or reject the request.
    pub fn resolve(definition: &StyleDefinition) -> Result<StyleResolution, StyleError> {
        let mut warnings = Vec::new();

        let render_method = match &definition.render_method {
            Some(tokens) => {
                let (method, unknown) = RenderMethod::from_token_list(tokens);
                warnings.extend(
                    unknown
                        .into_iter()
                        .map(|t| format!("unknown render method token '{}'", t)),
                );
                method
            }
            None => RenderMethod::NEAREST,
        };

        if let Some(interval) = definition.shade_interval {
            if interval < 0.0 {
                return Err(StyleError::Validation(format!(
                    "shade interval must be non-negative, got {}",
                    interval
                )));
            }
        }

        let legend_value_range = match definition.value_range {
            Some([low, high]) if low > high => {
                return Err(StyleError::Validation(format!(
                    "value range is inverted: [{}, {}]",
                    low, high
                )));
            }
            Some([low, high]) => Some((low, high)),
            None => None,
        };

        let legend = definition.legend.clone().unwrap_or_default();

        let configuration = StyleConfiguration {
            style_name: definition.name.clone(),
            style_title: definition.title.clone().unwrap_or_default(),
            style_abstract: definition.abstract_text.clone().unwrap_or_default(),
            render_method,
            shade_interval: definition.shade_interval.unwrap_or(0.0),
            contour_interval_low: definition.contour_interval_low.unwrap_or(0.0),
            contour_interval_high: definition.contour_interval_high.unwrap_or(0.0),
            legend_scale: legend.scale.unwrap_or(1.0),
            legend_offset: legend.offset.unwrap_or(0.0),
            legend_log: legend.log.unwrap_or(0.0),
            legend_tick_interval: legend.tick_interval.unwrap_or(0.0),
            legend_tick_round: legend.tick_round.unwrap_or(0.0),
            legend_value_range,
            legend_fixed_min_max: legend.fixed_min_max.unwrap_or(false),
            smoothing_filter: definition.smoothing_filter.unwrap_or(0),
            symbol_intervals: definition.symbol_intervals.clone(),
            color_stops: definition.color_stops.clone(),
        };

        Ok(StyleResolution {
            configuration,
            warnings,
        })
    }

    /// Find the first symbol rule matching `value`.
    pub fn symbol_for_value(&self, value: f64) -> Option<&SymbolInterval> {
        self.symbol_intervals.iter().find(|s| s.matches(value))
    }
}

/// Style-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("style parse error: {0}")]
    Parse(String),

    #[error("style validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_method_tokens() {
        let (method, unknown) = RenderMethod::from_token_list("point vector");
        assert!(method.contains(RenderMethod::POINT));
        assert!(method.contains(RenderMethod::VECTOR));
        assert!(!method.contains(RenderMethod::BARB));
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let (method, unknown) = RenderMethod::from_token_list("point, sparkles");
        assert!(method.contains(RenderMethod::POINT));
        assert_eq!(unknown, vec!["sparkles".to_string()]);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(
            Color::from_hex("00FF0080"),
            Some(Color::rgba(0, 255, 0, 128))
        );
        assert_eq!(Color::from_hex("#XYZ"), None);
    }

    #[test]
    fn test_symbol_interval_bounds() {
        let interval = SymbolInterval {
            min: Some(0.0),
            max: Some(10.0),
            symbol: "*".to_string(),
            offset_x: 0.0,
            offset_y: 0.0,
        };
        assert!(interval.matches(0.0));
        assert!(interval.matches(9.99));
        assert!(!interval.matches(10.0));
        assert!(!interval.matches(-0.1));
    }

    #[test]
    fn test_resolve_defaults() {
        let definition = StyleDefinition {
            name: "default".to_string(),
            ..Default::default()
        };
        let resolved = StyleConfiguration::resolve(&definition).unwrap();
        let config = resolved.configuration;
        assert_eq!(config.legend_scale, 1.0);
        assert_eq!(config.legend_offset, 0.0);
        assert_eq!(config.legend_log, 0.0);
        assert_eq!(config.legend_tick_interval, 0.0);
        assert!(!config.legend_fixed_min_max);
        assert!(config.legend_value_range.is_none());
    }

    #[test]
    fn test_resolve_rejects_inverted_range() {
        let definition = StyleDefinition {
            name: "bad".to_string(),
            value_range: Some([10.0, -10.0]),
            ..Default::default()
        };
        assert!(StyleConfiguration::resolve(&definition).is_err());
    }
}
