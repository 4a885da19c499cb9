//! Semantic classification of dataset dimensions.
//!
//! Dimension roles are derived purely from names and attributes, with no
//! mutable state. The matching policy is an ordered rule table: explicit
//! CF-style attribute rules first, case-insensitive name-substring rules
//! second. All lookup shapes (raw name, variable, dimension object)
//! reduce to the same decision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dataset_model::{Dataset, Dimension, Variable};
use serde::{Deserialize, Serialize};

/// Semantic role of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionType {
    /// The name refers to nothing in the dataset.
    None,
    /// A dimension with no recognized role.
    Normal,
    Time,
    ReferenceTime,
    Elevation,
    Member,
}

/// An attribute-based classification rule: the attribute must be present
/// and, when `value` is given, equal to it.
struct AttributeRule {
    attribute: &'static str,
    value: Option<&'static str>,
    dimension_type: DimensionType,
}

/// Attribute rules, in precedence order. These beat name heuristics.
const ATTRIBUTE_RULES: &[AttributeRule] = &[
    AttributeRule {
        attribute: "standard_name",
        value: Some("forecast_reference_time"),
        dimension_type: DimensionType::ReferenceTime,
    },
    AttributeRule {
        attribute: "standard_name",
        value: Some("time"),
        dimension_type: DimensionType::Time,
    },
    AttributeRule {
        attribute: "axis",
        value: Some("T"),
        dimension_type: DimensionType::Time,
    },
    AttributeRule {
        attribute: "axis",
        value: Some("Z"),
        dimension_type: DimensionType::Elevation,
    },
    AttributeRule {
        attribute: "positive",
        value: None,
        dimension_type: DimensionType::Elevation,
    },
    AttributeRule {
        attribute: "standard_name",
        value: Some("realization"),
        dimension_type: DimensionType::Member,
    },
];

/// Name-substring rules, in precedence order. `reference_time` must
/// precede the plain `time` rule so reference-time axes are not
/// misclassified by their `time` substring.
const NAME_RULES: &[(&str, DimensionType)] = &[
    ("reference_time", DimensionType::ReferenceTime),
    ("time", DimensionType::Time),
    ("lev", DimensionType::Elevation),
    ("height", DimensionType::Elevation),
    ("depth", DimensionType::Elevation),
    ("elevation", DimensionType::Elevation),
    ("pressure", DimensionType::Elevation),
    ("member", DimensionType::Member),
    ("realization", DimensionType::Member),
];

fn classify(name: &str, coordinate: Option<&Variable>) -> DimensionType {
    if let Some(var) = coordinate {
        for rule in ATTRIBUTE_RULES {
            match (var.text_attribute(rule.attribute), rule.value) {
                (Some(found), Some(expected)) if found == expected => return rule.dimension_type,
                (Some(_), None) => return rule.dimension_type,
                _ => {}
            }
        }
    }

    let lowered = name.to_ascii_lowercase();
    for (pattern, dimension_type) in NAME_RULES {
        if lowered.contains(pattern) {
            return *dimension_type;
        }
    }
    DimensionType::Normal
}

/// Classify a dimension by raw name.
///
/// Returns [`DimensionType::None`] when the name refers to neither a
/// dimension nor a variable of the dataset.
pub fn dimension_type(dataset: &Dataset, name: &str) -> DimensionType {
    if dataset.dimension(name).is_none() && dataset.variable(name).is_none() {
        return DimensionType::None;
    }
    classify(name, dataset.variable(name))
}

/// Classify by coordinate variable.
pub fn dimension_type_of_variable(variable: &Variable) -> DimensionType {
    classify(&variable.name, Some(variable))
}

/// Classify by dimension object.
pub fn dimension_type_of_dimension(dataset: &Dataset, dimension: &Dimension) -> DimensionType {
    dimension_type(dataset, &dimension.name)
}

/// First dimension of `variable` whose role matches `dimension_type`.
pub fn search_dimension_by_type<'a>(
    dataset: &'a Dataset,
    variable: &Variable,
    dimension_type: DimensionType,
) -> Option<&'a Dimension> {
    variable
        .dimensions
        .iter()
        .find(|name| self::dimension_type(dataset, name) == dimension_type)
        .and_then(|name| dataset.dimension(name))
}

/// Same as [`search_dimension_by_type`], but returns the dimension's
/// coordinate variable instead of the dimension.
pub fn dimension_variable_by_type<'a>(
    dataset: &'a Dataset,
    variable: &Variable,
    dimension_type: DimensionType,
) -> Option<&'a Variable> {
    search_dimension_by_type(dataset, variable, dimension_type)
        .and_then(|dim| dataset.variable(&dim.name))
}

/// The time coordinate variable for `variable`, if any.
pub fn time_dimension<'a>(dataset: &'a Dataset, variable: &Variable) -> Option<&'a Variable> {
    dimension_variable_by_type(dataset, variable, DimensionType::Time)
}

/// Units string of the time coordinate, e.g.
/// `"seconds since 1970-01-01 00:00:00"`.
pub fn time_units<'a>(dataset: &'a Dataset, variable: &Variable) -> Option<&'a str> {
    time_dimension(dataset, variable).and_then(|t| t.text_attribute("units"))
}

/// Parse the reference date out of a CF time-units string.
pub fn time_reference_date(units: &str) -> Option<DateTime<Utc>> {
    let (_, date_part) = units.split_once(" since ")?;
    let date_part = date_part.trim().trim_end_matches('Z');

    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_part, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_model::testdata::forecast_grid;
    use dataset_model::{Attribute, Dataset, Dimension, Variable};

    #[test]
    fn test_time_substring_matches() {
        let dataset = forecast_grid(4, 4);
        assert_eq!(dimension_type(&dataset, "time"), DimensionType::Time);
        assert_eq!(dimension_type(&dataset, "level"), DimensionType::Elevation);
        assert_eq!(dimension_type(&dataset, "lat"), DimensionType::Normal);
        assert_eq!(dimension_type(&dataset, "nothere"), DimensionType::None);
    }

    #[test]
    fn test_reference_time_attribute_beats_time_name() {
        // The name contains "time" but the standard_name marks it as a
        // forecast reference time.
        let dataset = Dataset::new()
            .with_dimension(Dimension::new("analysis_time", 1))
            .with_variable(
                Variable::new("analysis_time", &["analysis_time"])
                    .with_attribute(Attribute::text("standard_name", "forecast_reference_time"))
                    .with_values(vec![0.0]),
            );
        assert_eq!(
            dimension_type(&dataset, "analysis_time"),
            DimensionType::ReferenceTime
        );
    }

    #[test]
    fn test_reference_time_name_rule() {
        let dataset = Dataset::new().with_dimension(Dimension::new("forecast_reference_time", 1));
        assert_eq!(
            dimension_type(&dataset, "forecast_reference_time"),
            DimensionType::ReferenceTime
        );
    }

    #[test]
    fn test_overloads_agree() {
        let dataset = forecast_grid(4, 4);
        let by_name = dimension_type(&dataset, "level");
        let by_var = dimension_type_of_variable(dataset.variable("level").unwrap());
        let by_dim =
            dimension_type_of_dimension(&dataset, dataset.dimension("level").unwrap());
        assert_eq!(by_name, by_var);
        assert_eq!(by_name, by_dim);
    }

    #[test]
    fn test_search_by_type() {
        let dataset = forecast_grid(4, 4);
        let ta = dataset.variable("ta").unwrap();

        let dim = search_dimension_by_type(&dataset, ta, DimensionType::Time).unwrap();
        assert_eq!(dim.name, "time");
        let var = dimension_variable_by_type(&dataset, ta, DimensionType::Elevation).unwrap();
        assert_eq!(var.name, "level");
        assert!(search_dimension_by_type(&dataset, ta, DimensionType::Member).is_none());
    }

    #[test]
    fn test_time_units_and_reference_date() {
        let dataset = forecast_grid(4, 4);
        let ta = dataset.variable("ta").unwrap();
        let units = time_units(&dataset, ta).unwrap();
        assert_eq!(units, "seconds since 1970-01-01 00:00:00");

        let reference = time_reference_date(units).unwrap();
        assert_eq!(reference.timestamp(), 0);
        assert_eq!(
            time_reference_date("hours since 2000-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
        );
        assert!(time_reference_date("kelvin").is_none());
    }
}
