//! Period-over-period metrics derived from the anchor rows of the aggregate map.

use serde::Serialize;

use crate::core::config::PopPolicy;

use super::series::{AggregateMap, PeriodType};

/// Summary figures for the metrics card. A `None` field means "not available", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PopMetrics {
    #[serde(rename = "LastWk")]
    pub last_wk: Option<f64>,
    #[serde(rename = "WoW_Change")]
    pub wow_change: Option<f64>,
    #[serde(rename = "WoY_Change")]
    pub woy_change: Option<f64>,
    #[serde(rename = "MTD_Total")]
    pub mtd_total: Option<f64>,
    /// Computed for completeness; the card does not show it.
    #[serde(rename = "MoM_Change")]
    pub mom_change: Option<f64>,
    #[serde(rename = "MoY_Change")]
    pub moy_change: Option<f64>,
    #[serde(rename = "QTD_Total")]
    pub qtd_total: Option<f64>,
    #[serde(rename = "QoY_Change")]
    pub qoy_change: Option<f64>,
    #[serde(rename = "YTD_Total")]
    pub ytd_total: Option<f64>,
    #[serde(rename = "YoY_Change")]
    pub yoy_change: Option<f64>,
}

impl PopMetrics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_aggregates(aggregates: &AggregateMap, policy: &PopPolicy) -> Self {
        let mut metrics = Self::default();

        let wtd = aggregates.current(PeriodType::Week, 0);
        let last_week = aggregates.current(PeriodType::Week, 1);
        if let (Some(wtd), Some(last_week)) = (present(wtd), present(last_week)) {
            metrics.last_wk = Some(wtd);
            metrics.wow_change = pct_change(wtd, Some(last_week));
            metrics.woy_change = pct_change(wtd, aggregates.previous(PeriodType::Week, 0));
        }

        let mtd = aggregates.current(PeriodType::Month, 0);
        let last_month = aggregates.current(PeriodType::Month, 1);
        if let (Some(mtd), Some(last_month)) = (present(mtd), present(last_month)) {
            metrics.mtd_total = Some(mtd);
            metrics.mom_change = pct_change(mtd, Some(last_month));
            metrics.moy_change = pct_change(mtd, aggregates.previous(PeriodType::Month, 0));
        }

        let ytd = aggregates.current(PeriodType::Year, 0);
        let ytd_prior = aggregates.previous(PeriodType::Year, 0);
        if let (Some(ytd), Some(ytd_prior)) = (present(ytd), present(ytd_prior)) {
            metrics.ytd_total = Some(ytd);
            metrics.yoy_change = pct_change(ytd, Some(ytd_prior));
            metrics.qtd_total = Some(ytd * policy.quarter_share_of_year);
            metrics.qoy_change = metrics.yoy_change.map(|yoy| yoy * policy.quarter_dampening);
        }

        metrics
    }
}

/// Zero-is-missing: a value gates its metric group only when it is non-null, non-zero and not NaN.
/// A genuine zero is reported as "not available" rather than as a 0 baseline.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// `(a - b) / b`, or `None` when `b` is missing or zero.
pub fn pct_change(a: f64, b: Option<f64>) -> Option<f64> {
    let b = b.filter(|b| *b != 0.0)?;
    Some((a - b) / b).filter(|change| change.is_finite())
}
