//! Shared UI crate for the WBR dashboard: widget logic, Dioxus views and localization.

pub mod core;
pub mod i18n;
pub mod views;
pub mod widget;

pub mod components {
    mod locale_switcher;
    pub use locale_switcher::LocaleSwitcher;
}
