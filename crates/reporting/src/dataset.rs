//! Dataset snapshot — the result of one load: raw store, attributed clicks,
//! simulated transactions and reach.

use campaign_attribution::{attribute, simulate_conversions, total_reached};
use campaign_attribution::{AttributedClicks, ConversionParams, EventStore};
use campaign_core::types::Transaction;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::filter::Dimension;

/// Immutable once built; filter and aggregation borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    store: EventStore,
    clicks: AttributedClicks,
    transactions: Vec<Transaction>,
    total_reached: usize,
}

/// Distinct values available to each selector, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub send_country: Vec<String>,
    pub device_info: Vec<String>,
    pub platform_type: Vec<String>,
    pub customer_type: Vec<String>,
    pub gender: Vec<String>,
}

impl Dataset {
    /// Run attribution and conversion simulation once over `store`.
    pub fn build<R>(store: EventStore, params: &ConversionParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let clicks = attribute(&store);
        let transactions = simulate_conversions(&clicks, params, rng);
        let total_reached = total_reached(&store);

        info!(
            users = store.user_count(),
            events = store.event_count(),
            clicks = clicks.len(),
            transactions = transactions.len(),
            total_reached,
            "Dataset built"
        );

        Self {
            store,
            clicks,
            transactions,
            total_reached,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn clicks(&self) -> &AttributedClicks {
        &self.clicks
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total_reached(&self) -> usize {
        self.total_reached
    }

    pub fn filter_options(&self) -> FilterOptions {
        let distinct = |dimension: Dimension| {
            let mut values: Vec<String> = self
                .clicks
                .iter()
                .map(|c| dimension.value_of(c).to_string())
                .collect();
            values.sort();
            values.dedup();
            values
        };
        FilterOptions {
            send_country: distinct(Dimension::SendCountry),
            device_info: distinct(Dimension::DeviceInfo),
            platform_type: distinct(Dimension::PlatformType),
            customer_type: distinct(Dimension::CustomerType),
            gender: distinct(Dimension::Gender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::config::ConversionConfig;
    use campaign_core::types::{CustomerType, DeviceInfo, Event, EventName, PlatformType, User};
    use chrono::DateTime;
    use rand::rngs::mock::StepRng;

    fn user(id: &str, country: &str, device: DeviceInfo) -> User {
        User {
            user_id: id.to_string(),
            gender: "Male".to_string(),
            age: 29,
            send_country: country.to_string(),
            receive_country: "IN".to_string(),
            customer_type: CustomerType::Active,
            device_info: device,
            platform_type: PlatformType::App,
        }
    }

    fn event(id: &str, user_id: &str, name: EventName) -> Event {
        Event {
            event_id: id.to_string(),
            user_id: user_id.to_string(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            event_name: name,
        }
    }

    fn reference_params() -> ConversionParams {
        ConversionParams::from_config(&ConversionConfig::default()).unwrap()
    }

    #[test]
    fn test_build_and_options() {
        let store = EventStore::new(
            vec![
                user("u1", "US", DeviceInfo::Ios),
                user("u2", "AE", DeviceInfo::Android),
                user("u3", "US", DeviceInfo::Android),
            ],
            vec![
                event("e1", "u1", EventName::PushReceived),
                event("e2", "u1", EventName::PushClicked),
                event("e3", "u2", EventName::SliderClicked),
                event("e4", "u3", EventName::SliderReceived),
            ],
        );
        let dataset = Dataset::build(store, &reference_params(), &mut StepRng::new(0, 0));

        assert_eq!(dataset.clicks().len(), 2);
        assert_eq!(dataset.transactions().len(), 2);
        assert_eq!(dataset.total_reached(), 2);
        assert_eq!(dataset.store().user_count(), 3);

        let options = dataset.filter_options();
        assert_eq!(options.send_country, vec!["AE", "US"]);
        assert_eq!(options.device_info, vec!["Android", "iOS"]);
        assert_eq!(options.gender, vec!["Male"]);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::build(
            EventStore::default(),
            &reference_params(),
            &mut StepRng::new(0, 0),
        );
        assert!(dataset.clicks().is_empty());
        assert!(dataset.transactions().is_empty());
        assert_eq!(dataset.filter_options(), FilterOptions::default());
    }
}
