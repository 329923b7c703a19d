//! The drawing surface a refresh renders into: two chart containers and the metrics area.

use serde::Serialize;

use super::card::MetricsCard;
use super::chart::{ContainerSize, DualCharts};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Surface {
    pub weekly_container: ContainerSize,
    pub monthly_container: ContainerSize,
    pub metrics_card: Option<MetricsCard>,
    pub charts: DualCharts,
}

impl Surface {
    pub fn new(weekly_container: ContainerSize, monthly_container: ContainerSize) -> Self {
        Self {
            weekly_container,
            monthly_container,
            ..Self::default()
        }
    }

    /// Both containers at the same size.
    pub fn uniform(size: ContainerSize) -> Self {
        Self::new(size, size)
    }

    /// Drop everything drawn; container sizes are kept.
    pub fn clear(&mut self) {
        self.metrics_card = None;
        self.charts = DualCharts::default();
    }

    pub fn is_blank(&self) -> bool {
        self.metrics_card.is_none() && self.charts.is_empty()
    }
}
