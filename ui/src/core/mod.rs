//! Platform-agnostic building blocks shared by the report pipeline and the views.

pub mod config;
pub mod districts;
pub mod format;
pub mod platform;
pub mod row;
pub mod storage;
