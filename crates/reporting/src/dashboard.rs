//! Campaign insights dashboard — filter state plus on-demand recomputation
//! of the filtered lists and analytics snapshot.

use campaign_core::types::{AttributedClick, Transaction};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{aggregate, AnalyticsSnapshot};
use crate::dataset::Dataset;
use crate::filter::{
    allowed_user_ids, filter_clicks, filter_transactions, DateRange, Dimension, FilterCriteria,
    FilterState,
};

/// What the rendering layer receives for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub snapshot: AnalyticsSnapshot,
    pub clicks: Vec<AttributedClick>,
    pub transactions: Vec<Transaction>,
}

/// Filter and aggregate `dataset` under `criteria`. Pure.
pub fn compute_view(dataset: &Dataset, criteria: &FilterCriteria) -> DashboardView {
    let clicks = filter_clicks(dataset.clicks(), criteria);
    let transactions = {
        let allowed = allowed_user_ids(&clicks);
        filter_transactions(dataset.transactions(), &allowed)
    };
    let snapshot = aggregate(&clicks, &transactions, dataset.total_reached());

    debug!(
        clicks = clicks.len(),
        transactions = transactions.len(),
        "Dashboard view computed"
    );

    DashboardView {
        criteria: criteria.clone(),
        snapshot,
        clicks,
        transactions,
    }
}

/// Owns the filter state for one viewer of a dataset.
pub struct CampaignDashboard<'a> {
    dataset: &'a Dataset,
    state: FilterState,
}

impl<'a> CampaignDashboard<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            state: FilterState::new(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.state.set_date_range(range);
    }

    pub fn select(&mut self, dimension: Dimension, value: &str) {
        self.state.select(dimension, value);
    }

    /// A click on a chart segment.
    pub fn click_segment(&mut self, dimension: Dimension, value: &str) {
        self.state.toggle_drill_down(dimension, value);
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Recompute from scratch for the current state.
    pub fn view(&self) -> DashboardView {
        compute_view(self.dataset, self.state.criteria())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_attribution::{ConversionParams, EventStore};
    use campaign_core::config::ConversionConfig;
    use campaign_core::types::{CustomerType, DeviceInfo, Event, EventName, PlatformType, User};
    use chrono::DateTime;
    use rand::rngs::mock::StepRng;

    fn reference_params() -> ConversionParams {
        ConversionParams::from_config(&ConversionConfig::default()).unwrap()
    }

    fn dataset() -> Dataset {
        let users: Vec<User> = (0..6)
            .map(|i| User {
                user_id: format!("u{i}"),
                gender: if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
                age: 20 + i * 8,
                send_country: if i < 3 { "US" } else { "UK" }.to_string(),
                receive_country: "IN".to_string(),
                customer_type: CustomerType::Active,
                device_info: DeviceInfo::Ios,
                platform_type: PlatformType::App,
            })
            .collect();
        let names = [
            EventName::PushClicked,
            EventName::PopupClicked,
            EventName::SliderClicked,
        ];
        let mut events = Vec::new();
        for i in 0..6 {
            events.push(Event {
                event_id: format!("r{i}"),
                user_id: format!("u{i}"),
                timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap(),
                event_name: EventName::PushReceived,
            });
            events.push(Event {
                event_id: format!("c{i}"),
                user_id: format!("u{i}"),
                timestamp: DateTime::from_timestamp(1_700_000_100 + i as i64, 0).unwrap(),
                event_name: names[i % 3],
            });
        }
        Dataset::build(
            EventStore::new(users, events),
            &reference_params(),
            &mut StepRng::new(0, 0),
        )
    }

    #[test]
    fn test_unfiltered_view() {
        let data = dataset();
        let view = CampaignDashboard::new(&data).view();
        assert_eq!(view.snapshot.total_clicks, 6);
        assert_eq!(view.snapshot.total_conversions, 6);
        assert_eq!(view.snapshot.click_through_rate, 100.0);
        assert_eq!(view.snapshot.conversion_rate, 100.0);
        assert_eq!(view.clicks.len(), 6);
    }

    #[test]
    fn test_segment_click_round_trip() {
        let data = dataset();
        let mut dashboard = CampaignDashboard::new(&data);
        let baseline = dashboard.view();

        dashboard.click_segment(Dimension::Channel, "Popup");
        let drilled = dashboard.view();
        assert_eq!(drilled.snapshot.total_clicks, 2);
        assert!(drilled.transactions.iter().all(|t| t.channel.as_str() == "Popup"));

        dashboard.click_segment(Dimension::Channel, "Popup");
        assert_eq!(dashboard.view(), baseline);
    }

    #[test]
    fn test_selector_change_clears_drill_down() {
        let data = dataset();
        let mut dashboard = CampaignDashboard::new(&data);
        dashboard.click_segment(Dimension::Gender, "Female");
        dashboard.select(Dimension::SendCountry, "US");

        let view = dashboard.view();
        assert!(!view.criteria.drill_down.is_active());
        assert_eq!(view.snapshot.total_clicks, 3);
        assert_eq!(view.snapshot.total_conversions, 3);
        assert_eq!(view.snapshot.click_through_rate, 50.0);
    }

    #[test]
    fn test_empty_selection_yields_zero_kpis() {
        let data = dataset();
        let mut dashboard = CampaignDashboard::new(&data);
        dashboard.select(Dimension::SendCountry, "FR");
        let view = dashboard.view();
        assert_eq!(view.snapshot.total_clicks, 0);
        assert_eq!(view.snapshot.conversion_rate, 0.0);
        assert_eq!(view.snapshot.total_volume, 0.0);
        assert!(view.transactions.is_empty());

        dashboard.reset();
        assert_eq!(dashboard.view().snapshot.total_clicks, 6);
    }
}
