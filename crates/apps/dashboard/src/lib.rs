pub mod chart;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod headless;
pub mod http;

pub use chart::StationChart;
pub use config::DashboardConfig;
pub use coordinator::{Dashboard, LoadOutcome, LoadPlan, PendingLoad, SelectedRecord};
pub use error::DashboardError;
pub use headless::{LoggingCamera, LoggingEngine};
pub use http::HttpRecordSource;
