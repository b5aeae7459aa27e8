//! Shared domain types, configuration and errors for the campaign insights
//! pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{CampaignError, CampaignResult};
