//! Campaign analytics and reporting — filtering, aggregation and the
//! interactive dashboard over an attributed dataset.

pub mod aggregate;
pub mod buckets;
pub mod dashboard;
pub mod dataset;
pub mod filter;

pub use aggregate::{aggregate, AnalyticsSnapshot};
pub use buckets::AgeBucket;
pub use dashboard::{compute_view, CampaignDashboard, DashboardView};
pub use dataset::{Dataset, FilterOptions};
pub use filter::{DateRange, Dimension, DrillDown, FilterCriteria, FilterState};
