use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::views::Dashboard;

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting wbr web host");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Title { "WBR Dashboard" }
        document::Style { "{MAIN_CSS_INLINE}" }

        // Keyed on the language so the whole page re-runs its lookups after a switch.
        div { key: "{lang_code()}", class: "app",
            Dashboard {}
        }
    }
}
