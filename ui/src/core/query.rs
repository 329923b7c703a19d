//! Serde model of the pivoted query result handed over by the host on every refresh.
//!
//! Rows are loosely keyed: each field name maps either to a plain dimension cell
//! (`{ "value": .. }`) or, for pivoted measures, to one cell per pivot value
//! (`{ "Current": { "value": .. }, "Previous": { "value": .. } }`). Typed access happens
//! later through [`crate::core::schema::FieldBinding`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pivot value holding this cycle's figures.
pub const CURRENT_CYCLE: &str = "Current";
/// Pivot value holding the same cycle one year earlier.
pub const PREVIOUS_CYCLE: &str = "Previous";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub fields: QueryFields,
    #[serde(default)]
    pub pivots: Vec<PivotMeta>,
    #[serde(default)]
    pub data: Vec<Row>,
}

impl QueryResponse {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn pivot_names(&self) -> impl Iterator<Item = &str> {
        self.pivots.iter().map(|pivot| pivot.name.as_str())
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .dimension_like
            .iter()
            .map(|field| field.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFields {
    #[serde(default)]
    pub dimension_like: Vec<FieldMeta>,
    #[serde(default)]
    pub measure_like: Vec<FieldMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldMeta {
    pub fn named<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PivotMeta {
    pub fn named<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

/// One result row, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub BTreeMap<String, Cell>);

impl Row {
    /// Plain (unpivoted) cell for a dimension field.
    pub fn dimension(&self, field: &str) -> Option<&DataCell> {
        match self.0.get(field)? {
            Cell::Value(cell) => Some(cell),
            _ => None,
        }
    }

    /// Cell of a pivoted measure under one pivot value.
    pub fn pivoted(&self, field: &str, pivot: &str) -> Option<&DataCell> {
        match self.0.get(field)? {
            Cell::Pivoted(columns) => columns.get(pivot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Value(DataCell),
    Pivoted(BTreeMap<String, DataCell>),
    /// Anything the host sends that fits neither shape; kept so one odd cell doesn't reject
    /// the row.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCell {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl DataCell {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            rendered: None,
        }
    }

    /// Finite numeric value; numeric strings are accepted, everything else is `None`.
    pub fn number(&self) -> Option<f64> {
        let parsed = match &self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite())
    }

    /// Whole-number value, used for ranks.
    pub fn integer(&self) -> Option<i64> {
        match &self.value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && v.fract() == 0.0)
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }

    /// Display text: strings verbatim, scalars in JSON form, `rendered` as fallback.
    pub fn text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => self.rendered.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_distinguish_dimensions_from_pivoted_measures() {
        let row: Row = serde_json::from_value(json!({
            "wbr_template.type": { "value": "Week" },
            "wbr_template.total": {
                "Current": { "value": 120.5 },
                "Previous": { "value": null }
            }
        }))
        .unwrap();

        assert_eq!(row.dimension("wbr_template.type").unwrap().text(), "Week");
        assert!(row.dimension("wbr_template.total").is_none());
        assert_eq!(
            row.pivoted("wbr_template.total", CURRENT_CYCLE)
                .and_then(DataCell::number),
            Some(120.5)
        );
        assert_eq!(
            row.pivoted("wbr_template.total", PREVIOUS_CYCLE)
                .and_then(DataCell::number),
            None
        );
    }

    #[test]
    fn odd_cells_do_not_reject_the_row() {
        let row: Row = serde_json::from_value(json!({
            "wbr_template.type": { "value": "Month" },
            "weird": [1, 2, 3]
        }))
        .unwrap();
        assert!(matches!(row.0.get("weird"), Some(Cell::Other(_))));
    }

    #[test]
    fn numbers_parse_leniently_but_reject_garbage() {
        assert_eq!(DataCell::new(json!("42.5")).number(), Some(42.5));
        assert_eq!(DataCell::new(json!("n/a")).number(), None);
        assert_eq!(DataCell::new(json!(null)).number(), None);
        assert_eq!(DataCell::new(json!(true)).number(), None);
    }

    #[test]
    fn integers_accept_whole_floats_and_strings() {
        assert_eq!(DataCell::new(json!(3)).integer(), Some(3));
        assert_eq!(DataCell::new(json!(3.0)).integer(), Some(3));
        assert_eq!(DataCell::new(json!("0")).integer(), Some(0));
        assert_eq!(DataCell::new(json!(2.5)).integer(), None);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let response = QueryResponse::from_json("{}").unwrap();
        assert!(response.data.is_empty());
        assert!(response.pivots.is_empty());
        assert!(response.fields.measure_like.is_empty());
    }
}
