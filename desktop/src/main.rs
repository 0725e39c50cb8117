#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::logger::tracing::{info, warn, Level};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::config::ExportConfig;
use ui::views::{Home, Reports};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Home {},
    #[route("/reports")]
    Reports {},
}

#[cfg(feature = "desktop")]
fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Waqf Collections – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn nav_reports(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Reports {}, "{label}" })
}

#[component]
fn App() -> Element {
    let config = use_context_provider(ExportConfig::load);
    use_hook(move || match config.export_dir() {
        Ok(dir) => info!(dir = %dir.display(), "exports will be written here"),
        Err(err) => warn!("exports will ask for a folder: {err}"),
    });

    register_nav(NavBuilder {
        home: nav_home,
        reports: nav_reports,
    });

    rsx! {
        document::Style { "{ui::THEME_CSS}" }
        Router::<Route> {}
    }
}

#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar {}
        Outlet::<Route> {}
    }
}
