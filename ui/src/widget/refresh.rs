//! Per-update entry point: validate, reshape, compute, render.

use serde::Serialize;

use crate::core::config::VisConfig;
use crate::core::error::SetupError;
use crate::core::query::QueryResponse;
use crate::core::schema::FieldNames;

use super::card::render_metrics_card;
use super::chart::render_dual_charts;
use super::metrics::PopMetrics;
use super::series::extract;
use super::surface::Surface;

/// An error as the host displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostError {
    pub group: String,
    pub message: String,
}

impl From<&SetupError> for HostError {
    fn from(err: &SetupError) -> Self {
        Self {
            group: err.group().to_string(),
            message: err.to_string(),
        }
    }
}

/// Callbacks into whatever embeds the widget.
pub trait HostChannel {
    fn clear_errors(&mut self);
    fn add_error(&mut self, error: HostError);
    /// Signalled exactly once per refresh, on every path.
    fn done(&mut self);
}

/// Host channel that keeps errors in memory. Used by the Dioxus view and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedErrors {
    pub errors: Vec<HostError>,
    pub done_count: usize,
}

impl CollectedErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&HostError> {
        self.errors.first()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl HostChannel for CollectedErrors {
    fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn add_error(&mut self, error: HostError) {
        self.errors.push(error);
    }

    fn done(&mut self) {
        self.done_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Rendered(PopMetrics),
    SetupFailed(SetupError),
}

impl RefreshOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// Refresh with the default field names.
pub fn refresh(
    response: &QueryResponse,
    config: &VisConfig,
    surface: &mut Surface,
    host: &mut dyn HostChannel,
) -> RefreshOutcome {
    refresh_with_fields(response, config, &FieldNames::default(), surface, host)
}

pub fn refresh_with_fields(
    response: &QueryResponse,
    config: &VisConfig,
    fields: &FieldNames,
    surface: &mut Surface,
    host: &mut dyn HostChannel,
) -> RefreshOutcome {
    crate::i18n::init();

    host.clear_errors();
    surface.clear();

    let binding = match fields.bind(response) {
        Ok(binding) => binding,
        Err(err) => {
            tracing::warn!(group = err.group(), "{err}");
            host.add_error(HostError::from(&err));
            host.done();
            return RefreshOutcome::SetupFailed(err);
        }
    };

    let extraction = extract(&response.data, &binding);
    let metrics = PopMetrics::from_aggregates(&extraction.aggregates, &config.policy);

    render_metrics_card(&metrics, config, surface);
    render_dual_charts(&extraction.weekly, &extraction.monthly, config, surface);

    tracing::info!(
        rows = response.data.len(),
        aggregates = extraction.aggregates.len(),
        weekly = extraction.weekly.len(),
        monthly = extraction.monthly.len(),
        weekly_chart = surface.charts.weekly.is_some(),
        monthly_chart = surface.charts.monthly.is_some(),
        "wbr refresh rendered"
    );

    host.done();
    RefreshOutcome::Rendered(metrics)
}
