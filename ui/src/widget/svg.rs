//! SVG painter for rendered panels.
//!
//! The DOM view inlines [`panel_markup`]; the snapshot rasterises [`dashboard_markup`].

use std::fmt::Write as _;

use super::card::MetricsCard;
use super::chart::{coord as num, ChartPanel, LINE_WIDTH, X_LABEL_ROTATION};
use super::surface::Surface;

const FONT_FAMILY: &str = "Arial, sans-serif";
const AXIS_COLOR: &str = "#374151";
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

const CARD_ROW_HEIGHT: f64 = 24.0;
const CARD_PADDING: f64 = 10.0;
const LABEL_COLOR: &str = "#6B7280";
const NEUTRAL_COLOR: &str = "#1F2937";
const POSITIVE_COLOR: &str = "#10B981";
const NEGATIVE_COLOR: &str = "#EF4444";

/// Standalone `<svg>` element for one chart panel.
pub fn panel_markup(panel: &ChartPanel) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = num(panel.width),
        h = num(panel.height),
        font = FONT_FAMILY,
    );
    write_panel_body(&mut out, panel);
    out.push_str("</svg>");
    out
}

fn write_panel_body(out: &mut String, panel: &ChartPanel) {
    let _ = write!(
        out,
        r#"<g transform="translate({},{})">"#,
        num(panel.margin.left),
        num(panel.margin.top)
    );

    let _ = write!(
        out,
        r#"<text class="chart-title" x="{}" y="{}" text-anchor="middle" font-size="14" font-weight="bold">{}</text>"#,
        num(panel.plot_width / 2.0),
        num(-panel.margin.top / 2.0),
        escape(&panel.title)
    );

    // x axis
    let _ = write!(
        out,
        r#"<g class="axis axis-x" transform="translate(0,{})" font-size="10">"#,
        num(panel.plot_height)
    );
    let _ = write!(
        out,
        r#"<path class="domain" d="M0,0H{}" stroke="{AXIS_COLOR}" fill="none"/>"#,
        num(panel.plot_width)
    );
    for tick in &panel.x_ticks {
        let _ = write!(
            out,
            r#"<g class="tick" transform="translate({},0)"><line y2="{TICK_SIZE}" stroke="{AXIS_COLOR}"/><text y="{}" dx="-0.8em" dy="0.15em" transform="rotate({})" text-anchor="end" fill="{AXIS_COLOR}">{}</text></g>"#,
            num(tick.offset),
            num(TICK_SIZE + TICK_PADDING),
            num(X_LABEL_ROTATION),
            escape(&tick.label)
        );
    }
    out.push_str("</g>");

    // y axis
    out.push_str(r#"<g class="axis axis-y" font-size="10">"#);
    let _ = write!(
        out,
        r#"<path class="domain" d="M0,0V{}" stroke="{AXIS_COLOR}" fill="none"/>"#,
        num(panel.plot_height)
    );
    for tick in &panel.y_ticks {
        let _ = write!(
            out,
            r#"<g class="tick" transform="translate(0,{})"><line x2="{}" stroke="{AXIS_COLOR}"/><text x="{}" dy="0.32em" text-anchor="end" fill="{AXIS_COLOR}">{}</text></g>"#,
            num(tick.offset),
            num(-TICK_SIZE),
            num(-(TICK_SIZE + TICK_PADDING)),
            escape(&tick.label)
        );
    }
    out.push_str("</g>");

    for line in &panel.lines {
        if line.segments.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            r#"<path class="line line-{}" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            line.key.as_str(),
            line.path_data(),
            escape(&line.color),
            num(LINE_WIDTH)
        );
    }

    out.push_str("</g>");
}

/// One document with both charts side by side above the metrics table. `None` for a blank surface.
pub fn dashboard_markup(surface: &Surface) -> Option<String> {
    if surface.is_blank() {
        return None;
    }

    let panels: Vec<&ChartPanel> = [
        surface.charts.weekly.as_ref(),
        surface.charts.monthly.as_ref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    let charts_width: f64 = panels.iter().map(|panel| panel.width).sum();
    let charts_height = panels
        .iter()
        .map(|panel| panel.height)
        .fold(0.0_f64, f64::max);
    let card_height = surface
        .metrics_card
        .as_ref()
        .map_or(0.0, |_| CARD_PADDING * 2.0 + CARD_ROW_HEIGHT * 2.0);

    let width = if charts_width > 0.0 {
        charts_width
    } else {
        // Card only: give each of the nine cells some room.
        720.0
    };
    let height = charts_height + card_height;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = num(width),
        h = num(height),
        font = FONT_FAMILY,
    );
    let _ = write!(
        out,
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        num(width),
        num(height)
    );

    let mut x = 0.0;
    for panel in panels {
        let _ = write!(out, r#"<g transform="translate({},0)">"#, num(x));
        write_panel_body(&mut out, panel);
        out.push_str("</g>");
        x += panel.width;
    }

    if let Some(card) = &surface.metrics_card {
        write_card(&mut out, card, charts_height, width);
    }

    out.push_str("</svg>");
    Some(out)
}

fn write_card(out: &mut String, card: &MetricsCard, top: f64, width: f64) {
    if card.cells.is_empty() {
        return;
    }
    let column = width / card.cells.len() as f64;
    let label_y = top + CARD_PADDING + CARD_ROW_HEIGHT * 0.5;
    let value_y = label_y + CARD_ROW_HEIGHT;

    out.push_str(r#"<g class="metrics-area" text-anchor="middle">"#);
    let _ = write!(
        out,
        r##"<line x1="0" x2="{w}" y1="{y1}" y2="{y1}" stroke="#AAAAAA"/><line x1="0" x2="{w}" y1="{y2}" y2="{y2}" stroke="#AAAAAA"/>"##,
        w = num(width),
        y1 = num(top + CARD_PADDING),
        y2 = num(top + CARD_PADDING + CARD_ROW_HEIGHT),
    );

    for (index, cell) in card.cells.iter().enumerate() {
        let cx = column * (index as f64 + 0.5);
        let fill = match cell.tone_class() {
            Some("positive") => POSITIVE_COLOR,
            Some("negative") => NEGATIVE_COLOR,
            _ => NEUTRAL_COLOR,
        };
        let _ = write!(
            out,
            r#"<text class="metric-label" x="{x}" y="{ly}" dy="0.32em" font-size="11" font-weight="bold" fill="{LABEL_COLOR}">{label}</text><text class="metric-value" x="{x}" y="{vy}" dy="0.32em" font-size="12" font-weight="bold" fill="{fill}">{value}</text>"#,
            x = num(cx),
            ly = num(label_y),
            vy = num(value_y),
            label = escape(&cell.label),
            value = escape(&cell.display_text()),
        );
    }
    out.push_str("</g>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
