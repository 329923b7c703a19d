//! The WBR widget: series extraction, period-over-period metrics, card and dual charts.

pub mod card;
pub mod chart;
pub mod metrics;
pub mod refresh;
pub mod scale;
pub mod series;
#[cfg(not(target_arch = "wasm32"))]
pub mod snapshot;
pub mod surface;
pub mod svg;
mod view;

pub use chart::ContainerSize;
pub use metrics::PopMetrics;
pub use refresh::{
    refresh, refresh_with_fields, CollectedErrors, HostChannel, HostError, RefreshOutcome,
};
pub use surface::Surface;
pub use view::WbrWidget;
