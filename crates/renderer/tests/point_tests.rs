//! Integration tests for point and vector rendering.

use dataset_model::testdata::latlon_grid;
use datasource::{DataObject, DataSource, DataSourceResolver, OpenRequest, PointFeature};
use renderer::{BboxWarper, DrawCommand, DrawImage, PointRenderer, RenderError};
use wms_common::style::{StyleConfiguration, StyleDefinition, SymbolInterval};

/// A fully resolved data source over a 10x10 degree lat/lon grid.
fn resolved_source() -> DataSource {
    let dataset = latlon_grid(10, 10);
    let mut source = DataSource::new("pr");
    DataSourceResolver::new()
        .open(&dataset, None, &mut source, &OpenRequest::full())
        .unwrap();
    source
}

fn warper_for(source: &DataSource) -> BboxWarper {
    BboxWarper::new(source.bbox, 100, 100)
}

fn marker_count(commands: &[DrawCommand]) -> usize {
    commands.iter().filter(|c| c.is_marker()).count()
}

#[test]
fn test_thinning_clustered_points_draws_one() {
    let mut source = resolved_source();
    // Five stations within a fraction of a degree of each other; at
    // 10 px/degree they all fall inside the 30 px thinning radius.
    let points = (0..5)
        .map(|i| PointFeature::new(4.0 + 0.1 * i as f64, 45.0, 10.0 + i as f64))
        .collect();
    source.data_objects = vec![DataObject::new("pr").with_points(points)];

    let mut renderer = PointRenderer::new();
    renderer
        .set("mode=disc;thinningradius=30;plotvalue=false")
        .unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();

    assert_eq!(marker_count(&commands), 1);
}

#[test]
fn test_thinning_sparse_points_draws_all() {
    let mut source = resolved_source();
    // Pairwise separation of 3 degrees = 30 px, beyond the 20 px radius.
    let points = (0..3)
        .map(|i| PointFeature::new(1.0 + 3.0 * i as f64, 45.0, 1.0))
        .collect();
    source.data_objects = vec![DataObject::new("pr").with_points(points)];

    let mut renderer = PointRenderer::new();
    renderer
        .set("mode=disc;thinningradius=20;plotvalue=false")
        .unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();

    assert_eq!(marker_count(&commands), 3);
}

#[test]
fn test_station_filters() {
    let mut source = resolved_source();
    source.data_objects = vec![DataObject::new("pr").with_points(vec![
        PointFeature::new(2.0, 45.0, 1.0).with_id("ALPHA"),
        PointFeature::new(5.0, 45.0, 2.0).with_id("BRAVO"),
        PointFeature::new(8.0, 45.0, 3.0).with_id("CHARLIE"),
    ])];

    let mut renderer = PointRenderer::new();
    renderer
        .set("mode=disc;plotvalue=false;skippoints=BRAVO")
        .unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();
    assert_eq!(marker_count(&commands), 2);

    renderer
        .set("mode=disc;plotvalue=false;usepoints=CHARLIE")
        .unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();
    assert_eq!(marker_count(&commands), 1);
}

#[test]
fn test_symbol_mode_uses_interval_table() {
    let mut source = resolved_source();
    let mut style = StyleConfiguration::resolve(&StyleDefinition {
        name: "symbols".to_string(),
        ..Default::default()
    })
    .unwrap()
    .configuration;
    style.symbol_intervals = vec![
        SymbolInterval {
            min: Some(0.0),
            max: Some(10.0),
            symbol: "o".to_string(),
            offset_x: 0.0,
            offset_y: 0.0,
        },
        SymbolInterval {
            min: Some(10.0),
            max: None,
            symbol: "#".to_string(),
            offset_x: 0.0,
            offset_y: 0.0,
        },
    ];
    source.style = Some(style);
    source.data_objects = vec![DataObject::new("pr").with_points(vec![
        PointFeature::new(2.0, 45.0, 5.0),
        PointFeature::new(7.0, 45.0, 50.0),
    ])];

    let mut renderer = PointRenderer::new();
    renderer.set("mode=symbol;plotvalue=false").unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();

    let symbols: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Symbol { symbol, .. } => Some(symbol.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(symbols, vec!["o", "#"]);
}

#[test]
fn test_vector_mode_requires_two_components() {
    let mut source = resolved_source();
    source.data_objects = vec![DataObject::new("u10")];

    let mut renderer = PointRenderer::new();
    renderer.set("mode=vector").unwrap();
    let result = renderer.plan(&warper_for(&source), &source, 100, 100);
    assert!(matches!(
        result,
        Err(RenderError::MissingVectorComponents(1))
    ));
}

#[test]
fn test_vector_arrows_and_barbs() {
    let mut source = resolved_source();
    let u = DataObject::new("u10")
        .with_points(vec![PointFeature::new(5.0, 45.0, 10.0).with_id("STN")]);
    let v = DataObject::new("v10").with_points(vec![PointFeature::new(5.0, 45.0, 0.0)]);
    source.data_objects = vec![u, v];

    let mut renderer = PointRenderer::new();
    renderer.set("mode=vector;vectorscale=2").unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();
    // Shaft plus two arrowhead strokes.
    let lines = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { .. }))
        .count();
    assert_eq!(lines, 3);

    renderer.set("mode=barb").unwrap();
    let commands = renderer
        .plan(&warper_for(&source), &source, 100, 100)
        .unwrap();
    // 10 m/s is ~19 kt: a shaft with two full barbs, no pennant.
    let lines = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { .. }))
        .count();
    assert_eq!(lines, 3);
    assert!(!commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Polygon { .. })));
}

#[test]
fn test_unresolved_source_is_fatal() {
    let source = DataSource::new("pr");
    let warper = BboxWarper::new(wms_common::Extent::new(0.0, 0.0, 1.0, 1.0), 10, 10);
    let renderer = PointRenderer::new();
    assert!(matches!(
        renderer.plan(&warper, &source, 10, 10),
        Err(RenderError::UnresolvedDataSource(_))
    ));
}

#[test]
fn test_render_paints_discs() {
    let mut source = resolved_source();
    source.data_objects = vec![DataObject::new("pr").with_points(vec![
        PointFeature::new(3.0, 45.0, 1.0),
        PointFeature::new(7.0, 47.0, 2.0),
    ])];

    let mut renderer = PointRenderer::new();
    renderer
        .set("mode=disc;discradius=5;fillcolor=#00FF00")
        .unwrap();
    let mut image = DrawImage::new(100, 100);
    renderer
        .render(&warper_for(&source), &source, &mut image)
        .unwrap();

    assert!(image.painted_pixel_count() > 100);
}
