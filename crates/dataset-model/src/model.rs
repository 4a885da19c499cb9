//! Dataset, dimension, variable and attribute types.

use crate::ModelError;
use serde::{Deserialize, Serialize};

/// A named dimension with its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// Attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// First numeric element, converting integers to floats.
    pub fn first_number(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => v.first().copied(),
            AttrValue::Int(v) => v.first().map(|i| *i as f64),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// All numeric elements as floats.
    pub fn numbers(&self) -> Vec<f64> {
        match self {
            AttrValue::Float(v) => v.clone(),
            AttrValue::Int(v) => v.iter().map(|i| *i as f64).collect(),
            AttrValue::Text(s) => s.trim().parse().map(|f| vec![f]).unwrap_or_default(),
        }
    }
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Text(value.into()),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Float(vec![value]),
        }
    }

    pub fn numbers(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Float(values),
        }
    }
}

/// A dataset variable: named, bound to dimensions, carrying attributes
/// and optionally in-memory values (coordinate variables always do).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Ordered dimension names this variable spans.
    pub dimensions: Vec<String>,
    pub attributes: Vec<Attribute>,
    /// In-memory values; present for coordinate variables.
    pub values: Option<Vec<f64>>,
}

impl Variable {
    pub fn new(name: impl Into<String>, dimensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            attributes: Vec::new(),
            values: None,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    pub fn text_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|v| v.as_text())
    }

    pub fn number_attribute(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(|v| v.first_number())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Read coordinate values over `start..end`.
    pub fn coordinate_values(&self, start: usize, end: usize) -> Result<&[f64], ModelError> {
        let values = self
            .values
            .as_ref()
            .ok_or_else(|| ModelError::NoValues(self.name.clone()))?;
        if start > end || end > values.len() {
            return Err(ModelError::IndexOutOfRange {
                variable: self.name.clone(),
                start,
                end,
                len: values.len(),
            });
        }
        Ok(&values[start..end])
    }
}

/// A self-describing dataset: ordered dimensions, variables and global
/// attributes. Shared read-only between concurrent requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub attributes: Vec<Attribute>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// First variable carrying the named attribute.
    pub fn find_variable_with_attribute(&self, attribute: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.has_attribute(attribute))
    }

    /// Synthesize a placeholder coordinate variable (values `0..n-1`) for
    /// a dimension that has none. Returns the existing variable when one
    /// is already present.
    pub fn add_index_coordinate(&mut self, dim_name: &str) -> Result<&Variable, ModelError> {
        let len = self
            .dimension(dim_name)
            .ok_or_else(|| ModelError::DimensionNotFound(dim_name.to_string()))?
            .len;

        if self.variable(dim_name).is_none() {
            let values = (0..len).map(|i| i as f64).collect();
            self.variables
                .push(Variable::new(dim_name, &[dim_name]).with_values(values));
        }
        Ok(self.variable(dim_name).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let var = Variable::new("t2m", &["lat", "lon"])
            .with_attribute(Attribute::text("standard_name", "air_temperature"))
            .with_attribute(Attribute::number("scale_factor", 0.01));

        assert_eq!(
            var.text_attribute("standard_name"),
            Some("air_temperature")
        );
        assert_eq!(var.number_attribute("scale_factor"), Some(0.01));
        assert!(var.attribute("missing").is_none());
    }

    #[test]
    fn test_coordinate_values_range() {
        let var = Variable::new("lon", &["lon"]).with_values(vec![0.0, 0.5, 1.0, 1.5]);

        assert_eq!(var.coordinate_values(0, 2).unwrap(), &[0.0, 0.5]);
        assert_eq!(var.coordinate_values(2, 4).unwrap(), &[1.0, 1.5]);
        assert!(var.coordinate_values(2, 5).is_err());

        let empty = Variable::new("bare", &["bare"]);
        assert!(matches!(
            empty.coordinate_values(0, 1),
            Err(ModelError::NoValues(_))
        ));
    }

    #[test]
    fn test_add_index_coordinate() {
        let mut dataset = Dataset::new().with_dimension(Dimension::new("station", 4));

        let var = dataset.add_index_coordinate("station").unwrap();
        assert_eq!(var.values.as_deref(), Some(&[0.0, 1.0, 2.0, 3.0][..]));

        // Second call is a no-op returning the same variable.
        dataset.add_index_coordinate("station").unwrap();
        assert_eq!(
            dataset
                .variables
                .iter()
                .filter(|v| v.name == "station")
                .count(),
            1
        );

        assert!(dataset.add_index_coordinate("missing").is_err());
    }
}
