//! First-touch attribution — credits each user to the channel of their
//! earliest click.

use std::collections::HashSet;

use campaign_core::types::{AttributedClick, Event};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::store::EventStore;

/// Attributed clicks keyed by user id, in order of first qualifying click.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributedClicks {
    by_user: IndexMap<String, AttributedClick>,
}

impl AttributedClicks {
    pub fn get(&self, user_id: &str) -> Option<&AttributedClick> {
        self.by_user.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.by_user.contains_key(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributedClick> {
        self.by_user.values()
    }

    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributedClicks {
    type Item = &'a AttributedClick;
    type IntoIter = indexmap::map::Values<'a, String, AttributedClick>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_user.values()
    }
}

/// Attribute every user with at least one click to their earliest click.
///
/// Clicks are ordered by timestamp with a stable sort, so simultaneous clicks
/// resolve in input order. Clicks from unknown users are skipped.
pub fn attribute(store: &EventStore) -> AttributedClicks {
    let mut clicks: Vec<&Event> = store
        .events()
        .iter()
        .filter(|e| e.event_name.is_click())
        .collect();
    clicks.sort_by_key(|e| e.timestamp);

    let mut by_user: IndexMap<String, AttributedClick> = IndexMap::new();
    let mut dangling = 0u64;

    for event in clicks {
        if by_user.contains_key(&event.user_id) {
            continue;
        }
        let Some(user) = store.user(&event.user_id) else {
            debug!(
                event_id = %event.event_id,
                user_id = %event.user_id,
                "Click references unknown user, skipped"
            );
            dangling += 1;
            continue;
        };
        by_user.insert(
            event.user_id.clone(),
            AttributedClick {
                user: user.clone(),
                channel: event.event_name.channel(),
                timestamp: event.timestamp,
            },
        );
    }

    metrics::counter!("attribution.clicks_attributed").increment(by_user.len() as u64);
    metrics::counter!("attribution.dangling_events").increment(dangling);
    info!(
        events = store.event_count(),
        attributed = by_user.len(),
        dangling,
        "First-touch attribution complete"
    );

    AttributedClicks { by_user }
}

/// Number of distinct users that received at least one message.
pub fn total_reached(store: &EventStore) -> usize {
    store
        .events()
        .iter()
        .filter(|e| e.event_name.is_received())
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{Channel, CustomerType, DeviceInfo, EventName, PlatformType, User};
    use chrono::{DateTime, Utc};

    fn user(id: &str) -> User {
        User {
            user_id: id.to_string(),
            gender: "Female".to_string(),
            age: 33,
            send_country: "UK".to_string(),
            receive_country: "PH".to_string(),
            customer_type: CustomerType::Dormant,
            device_info: DeviceInfo::Android,
            platform_type: PlatformType::App,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn event(id: &str, user_id: &str, name: EventName, secs: i64) -> Event {
        Event {
            event_id: id.to_string(),
            user_id: user_id.to_string(),
            timestamp: at(secs),
            event_name: name,
        }
    }

    #[test]
    fn test_earliest_click_wins() {
        let store = EventStore::new(
            vec![user("u1"), user("u2"), user("u3")],
            vec![
                event("e1", "u1", EventName::PushClicked, 10),
                event("e2", "u1", EventName::PopupClicked, 5),
                event("e3", "u2", EventName::SliderClicked, 7),
            ],
        );

        let clicks = attribute(&store);
        assert_eq!(clicks.len(), 2);

        let u1 = clicks.get("u1").unwrap();
        assert_eq!(u1.channel, Channel::Popup);
        assert_eq!(u1.timestamp, at(5));
        let u2 = clicks.get("u2").unwrap();
        assert_eq!(u2.channel, Channel::Slider);
        assert_eq!(u2.timestamp, at(7));
        assert!(!clicks.contains("u3"));

        let order: Vec<_> = clicks.iter().map(|c| c.user_id()).collect();
        assert_eq!(order, vec!["u1", "u2"]);
    }

    #[test]
    fn test_simultaneous_clicks_keep_input_order() {
        let store = EventStore::new(
            vec![user("u1")],
            vec![
                event("e1", "u1", EventName::SliderClicked, 20),
                event("e2", "u1", EventName::PushClicked, 20),
            ],
        );
        assert_eq!(attribute(&store).get("u1").unwrap().channel, Channel::Slider);

        let reversed = EventStore::new(
            vec![user("u1")],
            vec![
                event("e2", "u1", EventName::PushClicked, 20),
                event("e1", "u1", EventName::SliderClicked, 20),
            ],
        );
        assert_eq!(attribute(&reversed).get("u1").unwrap().channel, Channel::Push);
    }

    #[test]
    fn test_received_events_and_unknown_users_are_ignored() {
        let store = EventStore::new(
            vec![user("u1")],
            vec![
                event("e1", "u1", EventName::PushReceived, 1),
                event("e2", "ghost", EventName::PushClicked, 2),
                event("e3", "u1", EventName::PopupClicked, 3),
            ],
        );
        let clicks = attribute(&store);
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks.get("u1").unwrap().channel, Channel::Popup);
        assert!(!clicks.contains("ghost"));
    }

    #[test]
    fn test_user_fields_are_merged() {
        let store = EventStore::new(
            vec![user("u1")],
            vec![event("e1", "u1", EventName::PushClicked, 1)],
        );
        let clicks = attribute(&store);
        let click = clicks.get("u1").unwrap();
        assert_eq!(click.user, user("u1"));
    }

    #[test]
    fn test_empty_store() {
        let store = EventStore::default();
        assert!(attribute(&store).is_empty());
        assert_eq!(total_reached(&store), 0);
    }

    #[test]
    fn test_total_reached_counts_distinct_receivers() {
        let store = EventStore::new(
            vec![user("u1")],
            vec![
                event("e1", "u1", EventName::PushReceived, 1),
                event("e2", "u1", EventName::PopupReceived, 2),
                event("e3", "u2", EventName::SliderReceived, 3),
                event("e4", "u3", EventName::SliderClicked, 4),
            ],
        );
        assert_eq!(total_reached(&store), 2);
    }
}
