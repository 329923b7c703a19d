use dioxus::prelude::*;

use crate::i18n;
use crate::t;

/// Language picker for the dashboard header.
///
/// Switching updates the `Signal<String>` language code from context (when the platform
/// provides one), so keyed subtrees remount and re-run their lookups.
#[component]
pub fn LocaleSwitcher() -> Element {
    i18n::init();

    let lang_code_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let mut current_lang = use_signal(|| {
        lang_code_ctx
            .as_ref()
            .map(|code| code())
            .unwrap_or_else(|| "en-US".to_string())
    });
    let langs = use_signal(i18n::available_languages);

    if langs().len() < 2 {
        return rsx! {};
    }

    let on_change = move |evt: FormEvent| {
        let value = evt.value();
        match i18n::set_language(&value) {
            Ok(()) => {
                current_lang.set(value.clone());
                if let Some(mut code) = lang_code_ctx {
                    code.set(value);
                }
            }
            Err(err) => tracing::warn!(lang = %value, "language switch failed: {err}"),
        }
    };

    rsx! {
        div { class: "dashboard__locale",
            label {
                class: "visually-hidden",
                r#for: "locale-select",
                {t!("dashboard-language-label")}
            }
            select {
                id: "locale-select",
                value: "{current_lang()}",
                oninput: on_change,
                for code in langs() {
                    option { key: "{code}", value: "{code}", "{code}" }
                }
            }
        }
    }
}
