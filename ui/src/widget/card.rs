//! Metrics card: one labelled cell per displayed metric, formatted and toned.

use serde::Serialize;

use crate::core::config::{VisConfig, DEFAULT_PERCENT_FORMAT, DEFAULT_VALUE_FORMAT};
use crate::core::format::{self, NumberFormat};

use super::metrics::PopMetrics;
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricSlot {
    LastWk,
    WoW,
    WoY,
    Mtd,
    MoY,
    Qtd,
    QoY,
    Ytd,
    YoY,
}

impl MetricSlot {
    /// Display order on the card. `MoM_Change` has no slot.
    pub const ALL: [MetricSlot; 9] = [
        MetricSlot::LastWk,
        MetricSlot::WoW,
        MetricSlot::WoY,
        MetricSlot::Mtd,
        MetricSlot::MoY,
        MetricSlot::Qtd,
        MetricSlot::QoY,
        MetricSlot::Ytd,
        MetricSlot::YoY,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::LastWk => "LastWk",
            Self::WoW => "WoW",
            Self::WoY => "WoY",
            Self::Mtd => "MTD",
            Self::MoY => "MoY",
            Self::Qtd => "QTD",
            Self::QoY => "QoY",
            Self::Ytd => "YTD",
            Self::YoY => "YoY",
        }
    }

    pub fn is_percent(self) -> bool {
        matches!(
            self,
            Self::WoW | Self::WoY | Self::MoY | Self::QoY | Self::YoY
        )
    }

    pub fn value(self, metrics: &PopMetrics) -> Option<f64> {
        match self {
            Self::LastWk => metrics.last_wk,
            Self::WoW => metrics.wow_change,
            Self::WoY => metrics.woy_change,
            Self::Mtd => metrics.mtd_total,
            Self::MoY => metrics.moy_change,
            Self::Qtd => metrics.qtd_total,
            Self::QoY => metrics.qoy_change,
            Self::Ytd => metrics.ytd_total,
            Self::YoY => metrics.yoy_change,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::LastWk => crate::t!("metric-last-wk"),
            Self::WoW => crate::t!("metric-wow"),
            Self::WoY => crate::t!("metric-woy"),
            Self::Mtd => crate::t!("metric-mtd"),
            Self::MoY => crate::t!("metric-moy"),
            Self::Qtd => crate::t!("metric-qtd"),
            Self::QoY => crate::t!("metric-qoy"),
            Self::Ytd => crate::t!("metric-ytd"),
            Self::YoY => crate::t!("metric-yoy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    NotAvailable,
    Formatted { text: String, tone: Tone },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCell {
    pub slot: MetricSlot,
    pub label: String,
    pub value: CellValue,
}

impl MetricCell {
    /// Text shown in the value row; "not available" is localised here.
    pub fn display_text(&self) -> String {
        match &self.value {
            CellValue::NotAvailable => crate::t!("metric-not-available"),
            CellValue::Formatted { text, .. } => text.clone(),
        }
    }

    pub fn tone(&self) -> Option<Tone> {
        match &self.value {
            CellValue::Formatted { tone, .. } => Some(*tone),
            CellValue::NotAvailable => None,
        }
    }

    /// Class of the span wrapping a formatted value; "not available" is unstyled.
    pub fn tone_class(&self) -> Option<&'static str> {
        self.tone().map(Tone::css_class)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsCard {
    pub cells: Vec<MetricCell>,
}

impl MetricsCard {
    pub fn build(metrics: &PopMetrics, config: &VisConfig) -> Self {
        let value_format = format::resolve(&config.value_format, DEFAULT_VALUE_FORMAT);
        let percent_format = format::resolve(&config.percent_format, DEFAULT_PERCENT_FORMAT);

        let cells = MetricSlot::ALL
            .into_iter()
            .map(|slot| MetricCell {
                slot,
                label: slot.label(),
                value: cell_value(slot, metrics, &value_format, &percent_format),
            })
            .collect();

        Self { cells }
    }

    pub fn cell(&self, slot: MetricSlot) -> Option<&MetricCell> {
        self.cells.iter().find(|cell| cell.slot == slot)
    }
}

fn cell_value(
    slot: MetricSlot,
    metrics: &PopMetrics,
    value_format: &NumberFormat,
    percent_format: &NumberFormat,
) -> CellValue {
    let Some(value) = slot.value(metrics).filter(|v| !v.is_nan()) else {
        return CellValue::NotAvailable;
    };

    if slot.is_percent() {
        CellValue::Formatted {
            text: percent_format.format(value),
            tone: if value >= 0.0 {
                Tone::Positive
            } else {
                Tone::Negative
            },
        }
    } else {
        CellValue::Formatted {
            text: value_format.format(value),
            tone: Tone::Neutral,
        }
    }
}

/// Build the card for `metrics` and place it in the surface's metrics area.
pub fn render_metrics_card(metrics: &PopMetrics, config: &VisConfig, surface: &mut Surface) {
    surface.metrics_card = Some(MetricsCard::build(metrics, config));
}
