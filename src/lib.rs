pub mod charts;
pub mod config;
pub mod constants;
pub mod covid;
pub mod error;
pub mod feed;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod server;

pub use covid::UpdateRecord;
pub use metrics::{extract_metric, matches_region, MetricKind};
pub use report::{region_report, total_for, totals, RegionReport, Totals};
