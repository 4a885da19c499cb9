//! Typed layer configuration objects.
//!
//! The configuration file parser is an external collaborator; these are
//! the typed objects it produces for one layer, consumed by the
//! resolution core.

use serde::{Deserialize, Serialize};

/// Parsed configuration for a single layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer name as published by the service.
    pub name: String,

    /// Explicit CRS override. When present it takes precedence over any
    /// projection metadata found in the dataset.
    #[serde(default)]
    pub projection: Option<ProjectionConfig>,

    /// Point-rendering settings string for this layer's style.
    #[serde(default)]
    pub style: Option<String>,

    /// Low-level render tuning.
    #[serde(default)]
    pub render_settings: Option<RenderSettings>,
}

impl LayerConfig {
    /// Parse a layer configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Explicit projection override from the layer configuration.
///
/// Either sub-field may be omitted; the resolver substitutes the default
/// geographic CRS for the missing part only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub proj4: Option<String>,
}

/// Render tuning knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Compatibility-mode stride override: read every n-th source cell
    /// on both axes instead of deriving the stride from the requested
    /// output resolution.
    #[serde(default)]
    pub striding: Option<usize>,

    /// Render-method token list, e.g. `"point vector"`.
    #[serde(default)]
    pub render_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer_config() {
        let json = r#"{
            "name": "radar",
            "projection": {"id": "EPSG:28992"},
            "render_settings": {"striding": 2}
        }"#;
        let config = LayerConfig::from_json(json).unwrap();
        assert_eq!(config.name, "radar");
        let projection = config.projection.unwrap();
        assert_eq!(projection.id.as_deref(), Some("EPSG:28992"));
        assert!(projection.proj4.is_none());
        assert_eq!(config.render_settings.unwrap().striding, Some(2));
    }

    #[test]
    fn test_minimal_config() {
        let config = LayerConfig::from_json(r#"{"name": "t2m"}"#).unwrap();
        assert!(config.projection.is_none());
        assert!(config.style.is_none());
    }
}
