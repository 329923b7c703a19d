use dioxus::prelude::*;

use crate::components::LocaleSwitcher;
use crate::core::config::VisConfig;
use crate::core::query::QueryResponse;
use crate::widget::{Surface, WbrWidget};

/// Query result bundled with the app so the dashboard has something to show.
pub const SAMPLE_QUERY_JSON: &str = include_str!("../../assets/sample/wbr_query.json");

pub fn sample_query() -> Result<QueryResponse, serde_json::Error> {
    QueryResponse::from_json(SAMPLE_QUERY_JSON)
}

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[component]
pub fn Dashboard() -> Element {
    let response = use_signal(|| match sample_query() {
        Ok(response) => Some(response),
        Err(err) => {
            tracing::error!("bundled sample query is invalid: {err}");
            None
        }
    });
    let config = use_signal(VisConfig::default);
    let mut latest = use_signal(|| None::<Surface>);
    let status = use_signal(|| ExportStatus::Idle);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some((
            "dashboard__status".to_string(),
            format!("{}…", crate::t!("dashboard-export-working")),
        )),
        ExportStatus::Done(path) => Some((
            "dashboard__status dashboard__status--success".to_string(),
            format!("{}: {path}", crate::t!("dashboard-export-saved")),
        )),
        ExportStatus::Error(err) => Some((
            "dashboard__status dashboard__status--error".to_string(),
            format!("{}: {err}", crate::t!("dashboard-export-failed")),
        )),
    };

    let export_handler = {
        let mut status_signal = status;
        move |_| {
            let Some(surface) = latest() else {
                return;
            };
            status_signal.set(ExportStatus::Working);
            #[cfg(not(target_arch = "wasm32"))]
            {
                match crate::widget::snapshot::export_png(&surface) {
                    Ok(path) => status_signal.set(ExportStatus::Done(path.display().to_string())),
                    Err(err) => {
                        tracing::warn!("snapshot export failed: {err}");
                        status_signal.set(ExportStatus::Error(err.to_string()));
                    }
                }
            }
            #[cfg(target_arch = "wasm32")]
            {
                let _ = surface;
                status_signal.set(ExportStatus::Idle);
            }
        }
    };

    rsx! {
        section { class: "page page-dashboard",
            header { class: "dashboard__header",
                div {
                    h1 { {crate::t!("dashboard-title")} }
                    p { class: "dashboard__subtitle", {crate::t!("dashboard-subtitle")} }
                }
                div { class: "dashboard__actions",
                    LocaleSwitcher {}
                    if cfg!(not(target_arch = "wasm32")) {
                        button {
                            r#type: "button",
                            class: "button",
                            disabled: latest.read().as_ref().map_or(true, Surface::is_blank),
                            onclick: export_handler,
                            {crate::t!("dashboard-export-png")}
                        }
                    }
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }

            if let Some(response) = response() {
                WbrWidget {
                    response,
                    config: config(),
                    on_render: move |surface| latest.set(Some(surface)),
                }
            } else {
                p { class: "setup-error", {crate::t!("dashboard-sample-invalid")} }
            }
        }
    }
}
