//! Dioxus component that measures its containers and shows the latest refresh.

use dioxus::prelude::*;

use crate::core::config::VisConfig;
use crate::core::query::QueryResponse;

use super::card::MetricsCard;
use super::chart::ContainerSize;
use super::refresh::{refresh, CollectedErrors};
use super::surface::Surface;
use super::svg::panel_markup;

/// The WBR widget: two charts above the metrics card, or the setup error.
///
/// Containers are measured on mount and on resize; every change of data, options or size
/// re-runs the refresh pipeline into a fresh surface.
#[component]
pub fn WbrWidget(
    response: ReadOnlySignal<QueryResponse>,
    config: ReadOnlySignal<VisConfig>,
    on_render: Option<EventHandler<Surface>>,
) -> Element {
    let mut weekly_size = use_signal(ContainerSize::default);
    let mut monthly_size = use_signal(ContainerSize::default);

    let rendered = use_memo(move || {
        let mut surface = Surface::new(weekly_size(), monthly_size());
        let mut host = CollectedErrors::new();
        refresh(&response.read(), &config.read(), &mut surface, &mut host);
        (surface, host)
    });

    use_effect(move || {
        let (surface, _) = rendered();
        if let Some(handler) = on_render {
            handler.call(surface);
        }
    });

    let (surface, host) = rendered();
    let weekly_svg = surface.charts.weekly.as_ref().map(panel_markup);
    let monthly_svg = surface.charts.monthly.as_ref().map(panel_markup);

    rsx! {
        div { class: "vis-container",
            if let Some(error) = host.first() {
                div { class: "setup-error", role: "alert",
                    strong { class: "setup-error__title", {crate::t!("setup-error-title")} }
                    p { class: "setup-error__message", "{error.message}" }
                }
            }

            div { class: "chart-area", id: "chart-container",
                div {
                    class: "chart chart--weekly",
                    id: "weekly-chart",
                    onmounted: move |evt| {
                        let mounted = evt.data().clone();
                        spawn(async move {
                            if let Ok(rect) = mounted.get_client_rect().await {
                                weekly_size.set(ContainerSize::new(rect.width(), rect.height()));
                            }
                        });
                    },
                    onresize: move |evt| {
                        if let Ok(size) = evt.get_content_box_size() {
                            weekly_size.set(ContainerSize::new(size.width, size.height));
                        }
                    },
                    if let Some(markup) = weekly_svg {
                        div { class: "chart__svg", dangerous_inner_html: "{markup}" }
                    }
                }
                div {
                    class: "chart chart--monthly",
                    id: "monthly-chart",
                    onmounted: move |evt| {
                        let mounted = evt.data().clone();
                        spawn(async move {
                            if let Ok(rect) = mounted.get_client_rect().await {
                                monthly_size.set(ContainerSize::new(rect.width(), rect.height()));
                            }
                        });
                    },
                    onresize: move |evt| {
                        if let Ok(size) = evt.get_content_box_size() {
                            monthly_size.set(ContainerSize::new(size.width, size.height));
                        }
                    },
                    if let Some(markup) = monthly_svg {
                        div { class: "chart__svg", dangerous_inner_html: "{markup}" }
                    }
                }
            }

            if let Some(card) = surface.metrics_card {
                MetricsTable { card }
            }
        }
    }
}

#[component]
fn MetricsTable(card: MetricsCard) -> Element {
    rsx! {
        div { class: "metrics-area",
            div { class: "metric-row", id: "metrics-card-labels",
                for cell in card.cells.iter() {
                    div { key: "{cell.slot.code()}", class: "metric-item",
                        div { class: "metric-label", "{cell.label}" }
                    }
                }
            }
            div { class: "metric-row", id: "metrics-card-values",
                for cell in card.cells.iter() {
                    div { key: "{cell.slot.code()}", class: "metric-item",
                        div { class: "metric-value",
                            if let Some(tone) = cell.tone_class() {
                                span { class: "{tone}", "{cell.display_text()}" }
                            } else {
                                "{cell.display_text()}"
                            }
                        }
                    }
                }
            }
        }
    }
}
