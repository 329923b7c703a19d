//! Required-field validation and the typed field binding handed to the extractor.

use serde::{Deserialize, Serialize};

use super::error::SetupError;
use super::query::QueryResponse;

/// Names of the fields that play each semantic role in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Dimension carrying the rank (periods back from now).
    pub indicator: String,
    /// Dimension carrying the axis label.
    pub reference: String,
    /// Pivot separating `Current` from `Previous`.
    pub cycle: String,
    /// Pivot carrying Week / Month / Year.
    pub period_type: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            indicator: "wbr_template.indicator".into(),
            reference: "wbr_template.reference".into(),
            cycle: "wbr_template.cycle".into(),
            period_type: "wbr_template.type".into(),
        }
    }
}

/// Field roles resolved once per refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub rank: String,
    pub label: String,
    pub period_type: String,
    pub measure: String,
}

impl FieldNames {
    /// Check the query declares every required pivot and dimension, then bind the measure.
    ///
    /// Pivots are checked first; a query missing both pivots and dimensions only reports
    /// the pivots.
    pub fn bind(&self, response: &QueryResponse) -> Result<FieldBinding, SetupError> {
        let pivots: Vec<&str> = response.pivot_names().collect();
        let missing_pivots = missing(&[&self.cycle, &self.period_type], &pivots);
        if !missing_pivots.is_empty() {
            return Err(SetupError::MissingPivots {
                fields: missing_pivots,
            });
        }

        let dimensions: Vec<&str> = response.dimension_names().collect();
        let missing_dimensions = missing(&[&self.indicator, &self.reference], &dimensions);
        if !missing_dimensions.is_empty() {
            return Err(SetupError::MissingDimensions {
                fields: missing_dimensions,
            });
        }

        let measure = response
            .fields
            .measure_like
            .first()
            .ok_or(SetupError::MissingMeasure)?;

        Ok(FieldBinding {
            rank: self.indicator.clone(),
            label: self.reference.clone(),
            period_type: self.period_type.clone(),
            measure: measure.name.clone(),
        })
    }
}

fn missing(required: &[&String], present: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !present.contains(&name.as_str()))
        .map(|name| name.to_string())
        .collect()
}
