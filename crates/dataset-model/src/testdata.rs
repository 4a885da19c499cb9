//! Test dataset builders.
//!
//! Small in-memory datasets with known metadata shapes, used by unit and
//! integration tests across the workspace. Each builder mirrors a
//! metadata convention seen in the wild: plain lat/lon grids, CF
//! grid-mapping variables, explicitly tagged projection variables, and
//! column-index axes.

use crate::model::{Attribute, Dataset, Dimension, Variable};

/// Evenly spaced coordinate values `start, start+step, ...` of length `n`.
pub fn coords(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A plain lat/lon grid: dims `[lat, lon]`, coordinate variables with CF
/// units, one data variable `pr` over `[lat, lon]`. No projection
/// variable; CRS resolution should fall back to the geographic default.
pub fn latlon_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("lat", ny))
        .with_dimension(Dimension::new("lon", nx))
        .with_variable(
            Variable::new("lon", &["lon"])
                .with_attribute(Attribute::text("units", "degrees_east"))
                .with_attribute(Attribute::text("standard_name", "longitude"))
                .with_values(coords(0.0, 1.0, nx)),
        )
        .with_variable(
            Variable::new("lat", &["lat"])
                .with_attribute(Attribute::text("units", "degrees_north"))
                .with_attribute(Attribute::text("standard_name", "latitude"))
                .with_values(coords(50.0, -1.0, ny)),
        )
        .with_variable(Variable::new("pr", &["lat", "lon"]))
}

/// A four-dimensional forecast grid: dims `[time, level, lat, lon]` with a
/// CF time coordinate, an elevation coordinate with a `positive`
/// attribute, and a data variable `ta` spanning all four.
pub fn forecast_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("time", 3))
        .with_dimension(Dimension::new("level", 5))
        .with_dimension(Dimension::new("lat", ny))
        .with_dimension(Dimension::new("lon", nx))
        .with_variable(
            Variable::new("time", &["time"])
                .with_attribute(Attribute::text("standard_name", "time"))
                .with_attribute(Attribute::text("units", "seconds since 1970-01-01 00:00:00"))
                .with_values(coords(0.0, 3600.0, 3)),
        )
        .with_variable(
            Variable::new("level", &["level"])
                .with_attribute(Attribute::text("units", "hPa"))
                .with_attribute(Attribute::text("positive", "down"))
                .with_values(vec![1000.0, 850.0, 700.0, 500.0, 300.0]),
        )
        .with_variable(
            Variable::new("lon", &["lon"])
                .with_attribute(Attribute::text("units", "degrees_east"))
                .with_values(coords(-10.0, 0.5, nx)),
        )
        .with_variable(
            Variable::new("lat", &["lat"])
                .with_attribute(Attribute::text("units", "degrees_north"))
                .with_values(coords(60.0, -0.5, ny)),
        )
        .with_variable(Variable::new("ta", &["time", "level", "lat", "lon"]))
}

/// A projected grid with a CF grid-mapping variable describing a Lambert
/// conformal conic projection. The data variable references it through
/// the `grid_mapping` attribute.
pub fn lambert_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("y", ny))
        .with_dimension(Dimension::new("x", nx))
        .with_variable(
            Variable::new("x", &["x"])
                .with_attribute(Attribute::text("units", "m"))
                .with_attribute(Attribute::text("standard_name", "projection_x_coordinate"))
                .with_values(coords(-500000.0, 2500.0, nx)),
        )
        .with_variable(
            Variable::new("y", &["y"])
                .with_attribute(Attribute::text("units", "m"))
                .with_attribute(Attribute::text("standard_name", "projection_y_coordinate"))
                .with_values(coords(-300000.0, 2500.0, ny)),
        )
        .with_variable(
            Variable::new("projection", &[])
                .with_attribute(Attribute::text("grid_mapping_name", "lambert_conformal_conic"))
                .with_attribute(Attribute::numbers("standard_parallel", vec![49.0, 77.0]))
                .with_attribute(Attribute::number("longitude_of_central_meridian", -95.0))
                .with_attribute(Attribute::number("latitude_of_projection_origin", 49.0))
                .with_attribute(Attribute::number("false_easting", 0.0))
                .with_attribute(Attribute::number("false_northing", 0.0))
                .with_attribute(Attribute::number("earth_radius", 6371229.0)),
        )
        .with_variable(
            Variable::new("dbz", &["y", "x"])
                .with_attribute(Attribute::text("grid_mapping", "projection")),
        )
}

/// A grid whose projection variable carries an explicit id + proj-string
/// pair, the self-describing tagging convention that bypasses CF
/// derivation entirely.
pub fn tagged_projection_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("y", ny))
        .with_dimension(Dimension::new("x", nx))
        .with_variable(
            Variable::new("x", &["x"])
                .with_attribute(Attribute::text("units", "km"))
                .with_values(coords(0.0, 1.0, nx)),
        )
        .with_variable(
            Variable::new("y", &["y"])
                .with_attribute(Attribute::text("units", "km"))
                .with_values(coords(-3650.0, 1.0, ny)),
        )
        .with_variable(
            Variable::new("projection", &[])
                .with_attribute(Attribute::text("id", "EPSG:28992"))
                .with_attribute(Attribute::text(
                    "proj4_params",
                    "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +units=m +no_defs",
                )),
        )
        .with_variable(
            Variable::new("precip", &["y", "x"])
                .with_attribute(Attribute::text("grid_mapping", "projection")),
        )
}

/// A grid whose X axis is a column index named `col` (edge-aligned, no
/// half-cell centering) rather than a true coordinate axis.
pub fn col_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("row", ny))
        .with_dimension(Dimension::new("col", nx))
        .with_variable(Variable::new("col", &["col"]).with_values(coords(0.0, 1.0, nx)))
        .with_variable(Variable::new("row", &["row"]).with_values(coords(0.0, 1.0, ny)))
        .with_variable(
            Variable::new("projection", &[])
                .with_attribute(Attribute::text("id", "EPSG:3857"))
                .with_attribute(Attribute::text(
                    "proj4_params",
                    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +no_defs",
                )),
        )
        .with_variable(
            Variable::new("counts", &["row", "col"])
                .with_attribute(Attribute::text("grid_mapping", "projection")),
        )
}

/// A grid with projected-looking axes and no projection metadata at all.
/// CRS resolution must report this as indeterminate.
pub fn bare_projected_grid(nx: usize, ny: usize) -> Dataset {
    Dataset::new()
        .with_dimension(Dimension::new("y", ny))
        .with_dimension(Dimension::new("x", nx))
        .with_variable(
            Variable::new("x", &["x"])
                .with_attribute(Attribute::text("units", "m"))
                .with_values(coords(0.0, 1000.0, nx)),
        )
        .with_variable(
            Variable::new("y", &["y"])
                .with_attribute(Attribute::text("units", "m"))
                .with_values(coords(0.0, 1000.0, ny)),
        )
        .with_variable(Variable::new("field", &["y", "x"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_are_consistent() {
        let grid = forecast_grid(20, 10);
        let ta = grid.variable("ta").unwrap();
        assert_eq!(ta.dimensions, vec!["time", "level", "lat", "lon"]);
        for dim in &ta.dimensions {
            assert!(grid.dimension(dim).is_some(), "missing dimension {}", dim);
        }

        let lambert = lambert_grid(8, 6);
        let mapping = lambert.variable("dbz").unwrap().text_attribute("grid_mapping");
        assert_eq!(mapping, Some("projection"));
    }
}
