pub mod analyzers;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod output;
pub mod table;

pub use config::InstitutionConfig;
pub use dashboard::DashboardReport;
pub use error::DashboardError;
pub use filter::Selection;
pub use table::{ResultRow, ResultTable};
