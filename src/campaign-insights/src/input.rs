//! JSON input files: one array of users, one array of events.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use campaign_core::error::{CampaignError, CampaignResult};
use serde::de::DeserializeOwned;
use tracing::info;

pub fn load_json_array<T: DeserializeOwned>(path: &Path) -> CampaignResult<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        CampaignError::Dataset(format!("cannot open {}: {e}", path.display()))
    })?;
    let items: Vec<T> = serde_json::from_reader(BufReader::new(file))?;
    info!(path = %path.display(), records = items.len(), "Loaded input file");
    Ok(items)
}
