//! Tests for style definition parsing and render-method mapping.

use std::collections::BTreeSet;
use wms_common::style::{RenderMethod, StyleConfiguration, StyleDefinition};

#[test]
fn test_render_method_round_trip() {
    let (method, _) = RenderMethod::from_token_list("point vector");
    let rendered = method.to_token_list();
    let tokens: BTreeSet<&str> = rendered.split_whitespace().collect();

    let expected: BTreeSet<&str> = ["point", "vector"].into_iter().collect();
    assert_eq!(tokens, expected);

    // Re-parsing the rendered list yields the same flag set.
    let (reparsed, unknown) = RenderMethod::from_token_list(&rendered);
    assert_eq!(reparsed, method);
    assert!(unknown.is_empty());
}

#[test]
fn test_comma_and_space_separators_are_equivalent() {
    let (a, _) = RenderMethod::from_token_list("nearest,contour shaded");
    let (b, _) = RenderMethod::from_token_list("shaded nearest contour");
    assert_eq!(a, b);
}

#[test]
fn test_resolve_full_style_from_json() {
    let json = r#"{
        "name": "windspeed",
        "title": "Wind speed",
        "render_method": "point barb thin",
        "shade_interval": 2.5,
        "legend": {"scale": 2.0, "offset": 30.0, "tick_interval": 10.0},
        "value_range": [0.0, 75.0],
        "symbol_intervals": [
            {"min": 0.0, "max": 10.0, "symbol": "o"},
            {"min": 10.0, "symbol": "+"}
        ]
    }"#;

    let definition = StyleDefinition::from_json(json).unwrap();
    let resolved = StyleConfiguration::resolve(&definition).unwrap();
    assert!(resolved.warnings.is_empty());

    let config = resolved.configuration;
    assert!(config.render_method.contains(RenderMethod::POINT));
    assert!(config.render_method.contains(RenderMethod::BARB));
    assert!(config.render_method.contains(RenderMethod::THIN));
    assert_eq!(config.shade_interval, 2.5);
    assert_eq!(config.legend_scale, 2.0);
    assert_eq!(config.legend_offset, 30.0);
    assert_eq!(config.legend_tick_interval, 10.0);
    assert_eq!(config.legend_value_range, Some((0.0, 75.0)));

    assert_eq!(config.symbol_for_value(5.0).unwrap().symbol, "o");
    assert_eq!(config.symbol_for_value(50.0).unwrap().symbol, "+");
    assert!(config.symbol_for_value(-1.0).is_none());
}

#[test]
fn test_unknown_render_tokens_become_warnings() {
    let definition = StyleDefinition {
        name: "forward-compat".to_string(),
        render_method: Some("point hologram".to_string()),
        ..Default::default()
    };

    let resolved = StyleConfiguration::resolve(&definition).unwrap();
    assert!(resolved
        .configuration
        .render_method
        .contains(RenderMethod::POINT));
    assert_eq!(resolved.warnings.len(), 1);
    assert!(resolved.warnings[0].contains("hologram"));
}
