mod home;
pub use home::Home;

mod reports;
pub use reports::Reports;
