//! Shared UI crate for Waqf Collections: row model, report aggregation, export pipeline
//! and the views every platform shell renders.

pub mod core;
pub mod report;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

/// Shared theme, embedded so shells need no asset pipeline.
pub const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));
