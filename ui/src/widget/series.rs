//! Turns pivoted query rows into the aggregate map and the two plotted series.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::query::{DataCell, Row, CURRENT_CYCLE, PREVIOUS_CYCLE};
use crate::core::schema::FieldBinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PeriodType {
    Week,
    Month,
    Year,
}

impl PeriodType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Week" => Some(Self::Week),
            "Month" => Some(Self::Month),
            "Year" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(type, rank)` pair; displays as `Week_0`, `Month_3`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub period: PeriodType,
    pub rank: i64,
}

impl PeriodKey {
    pub fn new(period: PeriodType, rank: i64) -> Self {
        Self { period, rank }
    }

    /// Anchor rows (rank 0) and year rows feed the card only.
    pub fn is_plotted(&self) -> bool {
        self.period != PeriodType::Year && self.rank != 0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.period, self.rank)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodValues {
    pub current: Option<f64>,
    pub previous: Option<f64>,
}

/// One value pair per `(type, rank)`. Recording an existing key replaces it: the last row wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateMap {
    entries: BTreeMap<PeriodKey, PeriodValues>,
}

impl AggregateMap {
    /// Store `values` under `key`, returning whatever it replaced.
    pub fn record(&mut self, key: PeriodKey, values: PeriodValues) -> Option<PeriodValues> {
        self.entries.insert(key, values)
    }

    pub fn get(&self, period: PeriodType, rank: i64) -> Option<&PeriodValues> {
        self.entries.get(&PeriodKey::new(period, rank))
    }

    pub fn current(&self, period: PeriodType, rank: i64) -> Option<f64> {
        self.get(period, rank).and_then(|values| values.current)
    }

    pub fn previous(&self, period: PeriodType, rank: i64) -> Option<f64> {
        self.get(period, rank).and_then(|values| values.previous)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeriodKey, &PeriodValues)> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub rank: i64,
    pub current: Option<f64>,
    pub previous: Option<f64>,
}

impl SeriesPoint {
    /// Largest of the two values with nulls counted as zero. Only used for axis sizing.
    pub fn peak(&self) -> f64 {
        self.current.unwrap_or(0.0).max(self.previous.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub aggregates: AggregateMap,
    /// Chronological: highest rank (oldest) first, rank 1 last.
    pub weekly: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
}

/// Single pass over the rows. Malformed rows are skipped, malformed values become `None`.
pub fn extract(rows: &[Row], binding: &FieldBinding) -> Extraction {
    let mut extraction = Extraction::default();

    for (index, row) in rows.iter().enumerate() {
        let Some(period) = row
            .dimension(&binding.period_type)
            .and_then(|cell| PeriodType::parse(&cell.text()))
        else {
            tracing::debug!(index, "skipping row without a Week/Month/Year type");
            continue;
        };
        let Some(rank) = row.dimension(&binding.rank).and_then(DataCell::integer) else {
            tracing::debug!(index, %period, "skipping row without an integer rank");
            continue;
        };

        let key = PeriodKey::new(period, rank);
        let values = PeriodValues {
            current: row
                .pivoted(&binding.measure, CURRENT_CYCLE)
                .and_then(DataCell::number),
            previous: row
                .pivoted(&binding.measure, PREVIOUS_CYCLE)
                .and_then(DataCell::number),
        };

        if extraction.aggregates.record(key, values).is_some() {
            tracing::debug!(%key, "duplicate period row replaced the earlier one");
        }

        if !key.is_plotted() {
            continue;
        }

        let point = SeriesPoint {
            label: row
                .dimension(&binding.label)
                .map(DataCell::text)
                .unwrap_or_default(),
            rank,
            current: values.current,
            previous: values.previous,
        };

        match period {
            PeriodType::Week => extraction.weekly.push(point),
            PeriodType::Month => extraction.monthly.push(point),
            PeriodType::Year => {}
        }
    }

    // Stable sort: equal ranks keep their input order.
    extraction.weekly.sort_by(|a, b| b.rank.cmp(&a.rank));
    extraction.monthly.sort_by(|a, b| b.rank.cmp(&a.rank));

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn binding() -> FieldBinding {
        FieldBinding {
            rank: "wbr.indicator".into(),
            label: "wbr.reference".into(),
            period_type: "wbr.type".into(),
            measure: "wbr.total".into(),
        }
    }

    fn row(period: &str, rank: Value, label: &str, current: Value, previous: Value) -> Row {
        serde_json::from_value(json!({
            "wbr.type": { "value": period },
            "wbr.indicator": { "value": rank },
            "wbr.reference": { "value": label },
            "wbr.total": {
                "Current": { "value": current },
                "Previous": { "value": previous }
            }
        }))
        .unwrap()
    }

    #[test]
    fn anchors_and_years_only_reach_the_aggregate_map() {
        let rows = vec![
            row("Week", json!(0), "WTD", json!(120), json!(100)),
            row("Year", json!(1), "LY", json!(5000), json!(4000)),
            row("Year", json!(0), "YTD", json!(9000), json!(8000)),
            row("Month", json!(0), "MTD", json!(400), json!(350)),
            row("Week", json!(1), "Wk 34", json!(100), json!(90)),
        ];

        let extraction = extract(&rows, &binding());

        assert_eq!(extraction.aggregates.len(), 5);
        assert_eq!(extraction.weekly.len(), 1);
        assert_eq!(extraction.weekly[0].label, "Wk 34");
        assert!(extraction.monthly.is_empty());
        assert_eq!(extraction.aggregates.current(PeriodType::Year, 1), Some(5000.0));
        assert_eq!(extraction.aggregates.current(PeriodType::Week, 0), Some(120.0));
    }

    #[test]
    fn series_run_oldest_first() {
        let rows = vec![
            row("Week", json!(1), "Wk 34", json!(10), json!(9)),
            row("Week", json!(3), "Wk 32", json!(30), json!(29)),
            row("Week", json!(2), "Wk 33", json!(20), json!(19)),
            row("Month", json!(2), "Jul", json!(200), json!(190)),
            row("Month", json!(1), "Aug", json!(100), json!(90)),
        ];

        let extraction = extract(&rows, &binding());

        let weekly: Vec<_> = extraction.weekly.iter().map(|p| p.rank).collect();
        let monthly: Vec<_> = extraction.monthly.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(weekly, vec![3, 2, 1]);
        assert_eq!(monthly, vec!["Jul", "Aug"]);
    }

    #[test]
    fn last_row_wins_for_duplicate_keys() {
        let rows = vec![
            row("Week", json!(0), "WTD", json!(1), json!(2)),
            row("Week", json!(0), "WTD", json!(3), json!(null)),
        ];

        let extraction = extract(&rows, &binding());

        assert_eq!(extraction.aggregates.len(), 1);
        assert_eq!(
            extraction.aggregates.get(PeriodType::Week, 0),
            Some(&PeriodValues {
                current: Some(3.0),
                previous: None
            })
        );
    }

    #[test]
    fn bad_values_become_null_independently() {
        let rows = vec![row("Month", json!(4), "May", json!("oops"), json!("12.5"))];

        let extraction = extract(&rows, &binding());

        assert_eq!(extraction.monthly[0].current, None);
        assert_eq!(extraction.monthly[0].previous, Some(12.5));
    }

    #[test]
    fn rows_without_type_or_rank_are_skipped() {
        let rows = vec![
            row("Quarter", json!(1), "Q2", json!(1), json!(1)),
            row("Week", json!("soon"), "Wk ?", json!(1), json!(1)),
            row("Week", json!(2), "Wk 2", json!(1), json!(1)),
        ];

        let extraction = extract(&rows, &binding());

        assert_eq!(extraction.aggregates.len(), 1);
        assert_eq!(extraction.weekly.len(), 1);
    }

    #[test]
    fn key_displays_as_type_underscore_rank() {
        assert_eq!(PeriodKey::new(PeriodType::Week, 0).to_string(), "Week_0");
        assert_eq!(PeriodKey::new(PeriodType::Month, 12).to_string(), "Month_12");
    }
}
