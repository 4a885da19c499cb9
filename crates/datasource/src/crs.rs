//! CRS resolution for a data source.
//!
//! Resolution order, first success wins: explicit configuration
//! override, self-describing tagged projection variable (id +
//! proj-string), CF grid-mapping derivation, plain lat/lon fallback.
//! A projection variable that is present but unparsable makes the CRS
//! indeterminate; it is never silently defaulted, because all downstream
//! geometry math depends on it.

use crate::datasource::DataSource;
use crate::error::ResolveError;
use crate::geometry;
use dataset_model::{Dataset, Variable};
use std::collections::HashMap;
use tracing::{debug, warn};
use wms_common::crs::{epsg_for_proj_string, DEFAULT_GEO_PROJ};
use wms_common::{CrsCode, CrsDescriptor, LayerConfig};

/// Resolves the CRS of data sources.
///
/// Proj-strings derived from CF grid-mapping attributes are memoized in
/// an explicit table keyed by projection-variable name, so repeated
/// resolution against the same dataset is cheap. The derivation is a
/// pure function of the variable's attributes, which makes the memo
/// idempotent.
#[derive(Debug, Default)]
pub struct CrsResolver {
    derived_proj_cache: HashMap<String, String>,
}

impl CrsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the CRS for `source`, writing the result into
    /// `source.crs`.
    pub fn resolve(
        &mut self,
        dataset: &Dataset,
        layer: Option<&LayerConfig>,
        source: &mut DataSource,
    ) -> Result<(), ResolveError> {
        if let Some(crs) = crs_from_config(layer) {
            debug!(code = %crs.code, "CRS taken from layer configuration");
            source.crs = crs;
            return Ok(());
        }

        let variable = dataset
            .variable(&source.variable)
            .ok_or_else(|| ResolveError::VariableNotFound(source.variable.clone()))?;

        if let Some(projection_var) = find_projection_variable(dataset, variable) {
            if let Some(crs) = crs_from_tagged_variable(projection_var) {
                debug!(code = %crs.code, variable = %projection_var.name,
                    "CRS copied from tagged projection variable");
                source.crs = crs;
                return Ok(());
            }

            let proj_string = self.derived_proj_string(projection_var).ok_or_else(|| {
                ResolveError::CrsIndeterminate {
                    variable: source.variable.clone(),
                    reason: format!(
                        "projection variable '{}' has no recognizable grid mapping",
                        projection_var.name
                    ),
                }
            })?;
            let code = epsg_from_projection_variable(projection_var, &proj_string);
            debug!(code = %code, variable = %projection_var.name,
                "CRS derived from CF grid mapping");
            source.crs = CrsDescriptor { code, proj_string };
            return Ok(());
        }

        if geometry::axes_are_geographic(dataset, variable) {
            debug!("no projection variable, axes are geographic; using default CRS");
            source.crs = CrsDescriptor::geographic();
            return Ok(());
        }

        Err(ResolveError::CrsIndeterminate {
            variable: source.variable.clone(),
            reason: "no projection metadata and axes are not geographic".to_string(),
        })
    }

    fn derived_proj_string(&mut self, projection_var: &Variable) -> Option<String> {
        if let Some(cached) = self.derived_proj_cache.get(&projection_var.name) {
            return Some(cached.clone());
        }
        let derived = proj_string_from_cf(projection_var)?;
        self.derived_proj_cache
            .insert(projection_var.name.clone(), derived.clone());
        Some(derived)
    }
}

/// CRS from an explicit configuration override. A missing sub-field is
/// filled from the default geographic CRS; the other sub-field is copied
/// verbatim.
fn crs_from_config(layer: Option<&LayerConfig>) -> Option<CrsDescriptor> {
    let projection = layer?.projection.as_ref()?;
    let code = match &projection.id {
        Some(id) => CrsCode::parse(id),
        None => CrsDescriptor::geographic().code,
    };
    let proj_string = projection
        .proj4
        .clone()
        .unwrap_or_else(|| DEFAULT_GEO_PROJ.to_string());
    Some(CrsDescriptor { code, proj_string })
}

/// Locate the projection variable for `variable`: the variable named by
/// its `grid_mapping` attribute, or failing that any variable that looks
/// like a projection description.
fn find_projection_variable<'a>(
    dataset: &'a Dataset,
    variable: &Variable,
) -> Option<&'a Variable> {
    if let Some(name) = variable.text_attribute("grid_mapping") {
        if let Some(projection_var) = dataset.variable(name) {
            return Some(projection_var);
        }
        warn!(name, "grid_mapping refers to a missing variable");
    }
    dataset.variables.iter().find(|v| {
        v.has_attribute("grid_mapping_name")
            || (v.has_attribute("proj4_params") && v.has_attribute("id"))
    })
}

/// CRS from a projection variable carrying an explicit id + proj-string
/// pair.
fn crs_from_tagged_variable(projection_var: &Variable) -> Option<CrsDescriptor> {
    let proj_string = projection_var
        .text_attribute("proj4_params")
        .or_else(|| projection_var.text_attribute("proj4"))?;
    let id = projection_var.text_attribute("id")?;
    Some(CrsDescriptor {
        code: CrsCode::parse(id),
        proj_string: proj_string.to_string(),
    })
}

/// EPSG code for a CF projection variable: an explicit attribute wins,
/// then reverse lookup of the proj-string, then the unknown sentinel.
/// A missing code never fails resolution; warping only needs the
/// proj-string.
fn epsg_from_projection_variable(projection_var: &Variable, proj_string: &str) -> CrsCode {
    if let Some(text) = projection_var
        .text_attribute("EPSG_code")
        .or_else(|| projection_var.text_attribute("epsg_code"))
    {
        return CrsCode::parse(text);
    }
    if let Some(number) = projection_var
        .number_attribute("EPSG_code")
        .or_else(|| projection_var.number_attribute("epsg_code"))
    {
        return CrsCode::Epsg(number as u32);
    }
    match epsg_for_proj_string(proj_string) {
        Some(code) => CrsCode::Epsg(code),
        None => {
            warn!(proj_string, "no EPSG code known for derived proj-string");
            CrsCode::Unknown
        }
    }
}

/// Derive a proj-string from CF grid-mapping attributes.
///
/// Pure function of the projection variable's attributes. Returns `None`
/// for an unrecognized `grid_mapping_name`.
pub fn proj_string_from_cf(projection_var: &Variable) -> Option<String> {
    let mapping = projection_var.text_attribute("grid_mapping_name")?;
    let num = |name: &str| projection_var.number_attribute(name);
    let num_or = |name: &str, default: f64| num(name).unwrap_or(default);

    let proj = match mapping {
        "latitude_longitude" => match num("earth_radius") {
            Some(radius) => format!("+proj=longlat +R={} +no_defs", radius),
            None => DEFAULT_GEO_PROJ.to_string(),
        },
        "lambert_conformal_conic" => {
            let parallels = projection_var
                .attribute("standard_parallel")
                .map(|a| a.numbers())
                .unwrap_or_default();
            let lat_1 = parallels.first().copied().unwrap_or(0.0);
            let lat_2 = parallels.get(1).copied().unwrap_or(lat_1);
            format!(
                "+proj=lcc +lat_1={} +lat_2={} +lat_0={} +lon_0={} +x_0={} +y_0={}{} +units=m +no_defs",
                lat_1,
                lat_2,
                num_or("latitude_of_projection_origin", 0.0),
                num_or("longitude_of_central_meridian", 0.0),
                num_or("false_easting", 0.0),
                num_or("false_northing", 0.0),
                earth_shape(projection_var),
            )
        }
        "polar_stereographic" => {
            let lon_0 = num("straight_vertical_longitude_from_pole")
                .or_else(|| num("longitude_of_projection_origin"))
                .unwrap_or(0.0);
            let mut proj = format!(
                "+proj=stere +lat_0={} +lon_0={}",
                num_or("latitude_of_projection_origin", 90.0),
                lon_0,
            );
            if let Some(lat_ts) = num("standard_parallel") {
                proj.push_str(&format!(" +lat_ts={}", lat_ts));
            } else if let Some(k) = num("scale_factor_at_projection_origin") {
                proj.push_str(&format!(" +k={}", k));
            }
            format!(
                "{} +x_0={} +y_0={}{} +units=m +no_defs",
                proj,
                num_or("false_easting", 0.0),
                num_or("false_northing", 0.0),
                earth_shape(projection_var),
            )
        }
        "stereographic" | "oblique_stereographic" => {
            let proj_name = if mapping == "oblique_stereographic" {
                "sterea"
            } else {
                "stere"
            };
            format!(
                "+proj={} +lat_0={} +lon_0={} +k={} +x_0={} +y_0={}{} +units=m +no_defs",
                proj_name,
                num_or("latitude_of_projection_origin", 0.0),
                num_or("longitude_of_projection_origin", 0.0),
                num_or("scale_factor_at_projection_origin", 1.0),
                num_or("false_easting", 0.0),
                num_or("false_northing", 0.0),
                earth_shape(projection_var),
            )
        }
        "mercator" => {
            let mut proj = format!(
                "+proj=merc +lon_0={}",
                num_or("longitude_of_projection_origin", 0.0)
            );
            if let Some(lat_ts) = num("standard_parallel") {
                proj.push_str(&format!(" +lat_ts={}", lat_ts));
            } else if let Some(k) = num("scale_factor_at_projection_origin") {
                proj.push_str(&format!(" +k={}", k));
            }
            format!(
                "{} +x_0={} +y_0={}{} +units=m +no_defs",
                proj,
                num_or("false_easting", 0.0),
                num_or("false_northing", 0.0),
                earth_shape(projection_var),
            )
        }
        "transverse_mercator" => format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k={} +x_0={} +y_0={}{} +units=m +no_defs",
            num_or("latitude_of_projection_origin", 0.0),
            num_or("longitude_of_central_meridian", 0.0),
            num_or("scale_factor_at_central_meridian", 1.0),
            num_or("false_easting", 0.0),
            num_or("false_northing", 0.0),
            earth_shape(projection_var),
        ),
        "geostationary" => {
            let sweep = projection_var
                .text_attribute("sweep_angle_axis")
                .unwrap_or("x");
            format!(
                "+proj=geos +lon_0={} +h={} +sweep={}{} +units=m +no_defs",
                num_or("longitude_of_projection_origin", 0.0),
                num_or("perspective_point_height", 35785831.0),
                sweep,
                earth_shape(projection_var),
            )
        }
        "rotated_latitude_longitude" => format!(
            "+proj=ob_tran +o_proj=longlat +o_lat_p={} +o_lon_p={} +lon_0={} +no_defs",
            num_or("grid_north_pole_latitude", 90.0),
            num_or("north_pole_grid_longitude", 0.0),
            180.0 + num_or("grid_north_pole_longitude", -180.0),
        ),
        _ => return None,
    };
    Some(proj)
}

/// Earth shape parameters shared by the projected mappings.
fn earth_shape(projection_var: &Variable) -> String {
    if let Some(radius) = projection_var.number_attribute("earth_radius") {
        return format!(" +R={}", radius);
    }
    match (
        projection_var.number_attribute("semi_major_axis"),
        projection_var.number_attribute("semi_minor_axis"),
    ) {
        (Some(a), Some(b)) => format!(" +a={} +b={}", a, b),
        _ => " +ellps=WGS84".to_string(),
    }
}
