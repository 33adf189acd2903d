//! Dashboard core: filtering, aggregation, display formatting and the
//! HTTP surface that hands chart series and table rows to the front-end.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod format;
pub mod routes;

pub use aggregate::Aggregates;
pub use config::Config;
pub use dashboard::{build_dashboard, filter_options, DashboardView, FilterOptions};
pub use filter::{apply, FilterCriteria, FilterQuery, Selection};
pub use format::{format_count, format_currency, format_percent};
pub use routes::{router, AppState};
