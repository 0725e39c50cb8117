use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::config::ExportConfig;
use ui::views::{Home, Reports};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/reports")]
    Reports {},
}

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_reports(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Reports {},
        "{label}"
    })
}

fn main() {
    dioxus::logger::init(Level::INFO).ok();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(ExportConfig::load);
    register_nav(NavBuilder {
        home: nav_home,
        reports: nav_reports,
    });

    rsx! {
        document::Title { "Waqf Collections" }
        document::Style { "{ui::THEME_CSS}" }

        Router::<Route> {}
    }
}

/// A web-specific layout around the shared navbar, so it can link to this crate's `Route`.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar {}
        Outlet::<Route> {}
    }
}
