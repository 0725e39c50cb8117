use dioxus::prelude::*;
use once_cell::sync::OnceCell;

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Platform-supplied navigation links.
///
/// The shared crate cannot see each shell's `Route` enum, so shells register closures
/// that build a `Link` around the label they are given:
///
/// ```ignore
/// register_nav(NavBuilder {
///     home: |label| rsx!( Link { class: "navbar__link", to: Route::Home {}, "{label}" } ),
///     reports: |label| rsx!( Link { class: "navbar__link", to: Route::Reports {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub home: fn(label: &str) -> Element,
    pub reports: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// First registration wins; later calls are ignored.
pub fn register_nav(builder: NavBuilder) {
    if NAV_BUILDER.set(builder).is_err() {
        tracing::debug!("navigation already registered");
    }
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let links = NAV_BUILDER
        .get()
        .map(|builder| ((builder.home)("Home"), (builder.reports)("Reports")));

    rsx! {
        document::Style { "{NAVBAR_CSS}" }

        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Waqf Collections" }
                    }
                    span { class: "navbar__brand-subtitle", "DCB reports" }
                }

                if let Some((home, reports)) = links {
                    nav { class: "navbar__links",
                        {home}
                        {reports}
                    }
                } else {
                    nav { class: "navbar__links", {children} }
                }
            }
        }
    }
}
