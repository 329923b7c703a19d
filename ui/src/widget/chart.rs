//! Dual line-chart layout: weekly and monthly panels sharing one value axis.
//!
//! The output is a plain model (sizes, ticks, line segments) so the same panel can be painted
//! in the DOM and rasterised for snapshots.

use serde::Serialize;

use crate::core::config::{VisConfig, DEFAULT_VALUE_FORMAT};
use crate::core::format::{self, NumberFormat};

use super::scale::{LinearScale, PointScale};
use super::series::SeriesPoint;
use super::surface::Surface;

pub const MARGIN: Margin = Margin {
    top: 20.0,
    right: 30.0,
    bottom: 50.0,
    left: 60.0,
};
/// Headroom above the tallest point.
pub const Y_HEADROOM: f64 = 1.1;
pub const Y_TICK_COUNT: usize = 10;
pub const X_PADDING: f64 = 0.5;
pub const LINE_WIDTH: f64 = 2.0;
pub const X_LABEL_ROTATION: f64 = -45.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Measured size of a chart container, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKey {
    Current,
    Previous,
}

impl SeriesKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Previous => "previous",
        }
    }

    fn value(self, point: &SeriesPoint) -> Option<f64> {
        match self {
            Self::Current => point.current,
            Self::Previous => point.previous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    /// Offset along the axis inside the plot area.
    pub offset: f64,
}

/// One polyline; every `None` value in the series starts a new segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub key: SeriesKey,
    pub color: String,
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl LineTrace {
    /// SVG path data, one `M` per segment.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            for (i, (x, y)) in segment.iter().enumerate() {
                d.push(if i == 0 { 'M' } else { 'L' });
                d.push_str(&format!("{},{}", coord(*x), coord(*y)));
            }
        }
        d
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub plot_width: f64,
    pub plot_height: f64,
    pub y_domain: (f64, f64),
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub lines: Vec<LineTrace>,
}

impl ChartPanel {
    pub fn line(&self, key: SeriesKey) -> Option<&LineTrace> {
        self.lines.iter().find(|line| line.key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DualCharts {
    pub weekly: Option<ChartPanel>,
    pub monthly: Option<ChartPanel>,
}

impl DualCharts {
    pub fn is_empty(&self) -> bool {
        self.weekly.is_none() && self.monthly.is_none()
    }
}

pub struct ChartStyle<'a> {
    pub current_color: &'a str,
    pub prev_color: &'a str,
    pub value_format: &'a NumberFormat,
}

/// Largest `current`/`previous` across both series, nulls counted as zero. `None` without points.
pub fn shared_max(weekly: &[SeriesPoint], monthly: &[SeriesPoint]) -> Option<f64> {
    weekly
        .iter()
        .chain(monthly)
        .map(SeriesPoint::peak)
        .fold(None, |acc: Option<f64>, peak| Some(acc.map_or(peak, |m| m.max(peak))))
}

/// Value-axis domain shared by both charts. Falls back to `[0, 1]` when there is nothing to scale.
pub fn value_domain(shared_max: Option<f64>) -> (f64, f64) {
    match shared_max {
        Some(max) if max.is_finite() && max > 0.0 => (0.0, max * Y_HEADROOM),
        _ => (0.0, 1.0),
    }
}

/// Lay out one chart inside `container`. `None` when the container has no room for a plot.
pub fn layout_chart(
    series: &[SeriesPoint],
    title: &str,
    container: ContainerSize,
    y_domain: (f64, f64),
    style: &ChartStyle<'_>,
) -> Option<ChartPanel> {
    let plot_width = container.width - MARGIN.left - MARGIN.right;
    let plot_height = container.height - MARGIN.top - MARGIN.bottom;
    if !(plot_width > 0.0 && plot_height > 0.0) {
        return None;
    }

    let x = PointScale::new(
        series.iter().map(|point| point.label.as_str()),
        (0.0, plot_width),
        X_PADDING,
    );
    let y = LinearScale::new(y_domain, (plot_height, 0.0));

    let x_ticks = x
        .domain()
        .iter()
        .filter_map(|label| {
            x.position(label).map(|offset| Tick {
                label: label.clone(),
                offset,
            })
        })
        .collect();

    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            label: style.value_format.format(value),
            offset: y.map(value),
        })
        .collect();

    let lines = [
        (SeriesKey::Current, style.current_color),
        (SeriesKey::Previous, style.prev_color),
    ]
    .into_iter()
    .map(|(key, color)| LineTrace {
        key,
        color: color.to_string(),
        segments: segments(series, key, &x, &y),
    })
    .collect();

    Some(ChartPanel {
        title: title.to_string(),
        width: container.width,
        height: container.height,
        margin: MARGIN,
        plot_width,
        plot_height,
        y_domain,
        x_ticks,
        y_ticks,
        lines,
    })
}

fn segments(
    series: &[SeriesPoint],
    key: SeriesKey,
    x: &PointScale,
    y: &LinearScale,
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for point in series {
        match (key.value(point), x.position(&point.label)) {
            (Some(value), Some(px)) => current.push((px, y.map(value))),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Render the weekly and monthly panels into `surface` on one shared value axis.
pub fn render_dual_charts(
    weekly: &[SeriesPoint],
    monthly: &[SeriesPoint],
    config: &VisConfig,
    surface: &mut Surface,
) {
    let value_format = format::resolve(&config.value_format, DEFAULT_VALUE_FORMAT);
    let style = ChartStyle {
        current_color: &config.current_color,
        prev_color: &config.prev_color,
        value_format: &value_format,
    };
    let y_domain = value_domain(shared_max(weekly, monthly));

    let weekly_title = crate::t!("chart-weekly-title");
    let monthly_title = crate::t!("chart-monthly-title");

    surface.charts.weekly = layout_chart(
        weekly,
        &weekly_title,
        surface.weekly_container,
        y_domain,
        &style,
    );
    surface.charts.monthly = layout_chart(
        monthly,
        &monthly_title,
        surface.monthly_container,
        y_domain,
        &style,
    );

    if surface.charts.weekly.is_none() {
        tracing::debug!(
            size = ?surface.weekly_container,
            "weekly container not laid out; chart skipped"
        );
    }
    if surface.charts.monthly.is_none() {
        tracing::debug!(
            size = ?surface.monthly_container,
            "monthly container not laid out; chart skipped"
        );
    }
}

/// Two-decimal coordinates without trailing zeros.
pub(crate) fn coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, rank: i64, current: Option<f64>, previous: Option<f64>) -> SeriesPoint {
        SeriesPoint {
            label: label.into(),
            rank,
            current,
            previous,
        }
    }

    fn style(format: &NumberFormat) -> ChartStyle<'_> {
        ChartStyle {
            current_color: "#3B82F6",
            prev_color: "#D1D5DB",
            value_format: format,
        }
    }

    #[test]
    fn shared_max_spans_both_series_and_ignores_nulls() {
        let weekly = vec![point("a", 2, Some(40.0), None), point("b", 1, None, Some(100.0))];
        let monthly = vec![point("Jan", 1, Some(80.0), Some(60.0))];
        assert_eq!(shared_max(&weekly, &monthly), Some(100.0));
        assert_eq!(value_domain(shared_max(&weekly, &monthly)), (0.0, 100.0 * 1.1));
        assert_eq!(shared_max(&[], &[]), None);
        assert_eq!(value_domain(None), (0.0, 1.0));
    }

    #[test]
    fn null_values_break_the_line() {
        let format = NumberFormat::parse(",.0f").unwrap();
        let series = vec![
            point("W1", 3, Some(10.0), Some(5.0)),
            point("W2", 2, None, Some(6.0)),
            point("W3", 1, Some(30.0), Some(7.0)),
        ];

        let panel = layout_chart(
            &series,
            "Weekly",
            ContainerSize::new(390.0, 290.0),
            (0.0, 33.0),
            &style(&format),
        )
        .unwrap();

        let current = panel.line(SeriesKey::Current).unwrap();
        assert_eq!(current.segments.len(), 2);
        assert_eq!(current.point_count(), 2);
        assert_eq!(current.path_data().matches('M').count(), 2);
        assert!(!current.path_data().contains('L'));

        let previous = panel.line(SeriesKey::Previous).unwrap();
        assert_eq!(previous.segments.len(), 1);
        assert_eq!(previous.point_count(), 3);
    }

    #[test]
    fn plot_area_is_container_minus_margins() {
        let format = NumberFormat::parse(",.0f").unwrap();
        let series = vec![point("W1", 1, Some(0.0), Some(110.0))];
        let panel = layout_chart(
            &series,
            "Weekly",
            ContainerSize::new(390.0, 290.0),
            (0.0, 110.0),
            &style(&format),
        )
        .unwrap();

        assert_eq!(panel.plot_width, 300.0);
        assert_eq!(panel.plot_height, 220.0);
        let current = panel.line(SeriesKey::Current).unwrap();
        assert_eq!(current.segments[0][0], (150.0, 220.0));
        let previous = panel.line(SeriesKey::Previous).unwrap();
        assert_eq!(previous.segments[0][0], (150.0, 0.0));
        assert_eq!(panel.y_ticks.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(panel.y_ticks.last().map(|t| t.label.as_str()), Some("110"));
    }

    #[test]
    fn collapsed_container_skips_the_chart() {
        let format = NumberFormat::parse(",.0f").unwrap();
        let series = vec![point("W1", 1, Some(1.0), Some(1.0))];
        assert!(layout_chart(
            &series,
            "Weekly",
            ContainerSize::new(80.0, 400.0),
            (0.0, 1.0),
            &style(&format)
        )
        .is_none());
        assert!(layout_chart(
            &series,
            "Weekly",
            ContainerSize::default(),
            (0.0, 1.0),
            &style(&format)
        )
        .is_none());
    }

    #[test]
    fn empty_series_still_gets_axes() {
        let format = NumberFormat::parse(",.0f").unwrap();
        let panel = layout_chart(
            &[],
            "Monthly",
            ContainerSize::new(400.0, 300.0),
            value_domain(None),
            &style(&format),
        )
        .unwrap();
        assert!(panel.x_ticks.is_empty());
        assert!(!panel.y_ticks.is_empty());
        assert!(panel.lines.iter().all(|line| line.segments.is_empty()));
    }

    #[test]
    fn path_data_is_compact() {
        let trace = LineTrace {
            key: SeriesKey::Current,
            color: "#000".into(),
            segments: vec![vec![(50.0, 100.5), (150.0, 80.123)], vec![(250.0, 0.0)]],
        };
        assert_eq!(trace.path_data(), "M50,100.5L150,80.12M250,0");
    }
}
