//! Event store — immutable users and engagement events for one dataset load.

use campaign_core::types::{Event, User};
use indexmap::IndexMap;

/// Read-only holder of the raw dataset. Performs no validation beyond what
/// the types enforce; events may reference users that are not present.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    users: IndexMap<String, User>,
    events: Vec<Event>,
}

impl EventStore {
    /// Build a store. If two users share an id, the first one is kept.
    pub fn new(users: impl IntoIterator<Item = User>, events: Vec<Event>) -> Self {
        let mut by_id = IndexMap::new();
        for user in users {
            by_id.entry(user.user_id.clone()).or_insert(user);
        }
        Self {
            users: by_id,
            events,
        }
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{CustomerType, DeviceInfo, EventName, PlatformType};
    use chrono::DateTime;

    fn user(id: &str, age: u8) -> User {
        User {
            user_id: id.to_string(),
            gender: "Male".to_string(),
            age,
            send_country: "US".to_string(),
            receive_country: "MX".to_string(),
            customer_type: CustomerType::Active,
            device_info: DeviceInfo::Ios,
            platform_type: PlatformType::Website,
        }
    }

    #[test]
    fn test_lookup_and_iteration_order() {
        let events = vec![Event {
            event_id: "e1".into(),
            user_id: "ghost".into(),
            timestamp: DateTime::from_timestamp(10, 0).unwrap(),
            event_name: EventName::PushClicked,
        }];
        let store = EventStore::new(vec![user("b", 20), user("a", 30)], events);

        assert_eq!(store.user_count(), 2);
        assert_eq!(store.event_count(), 1);
        assert_eq!(store.user("a").map(|u| u.age), Some(30));
        assert!(store.user("ghost").is_none());
        let ids: Vec<_> = store.users().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_user_keeps_first() {
        let store = EventStore::new(vec![user("a", 20), user("a", 60)], Vec::new());
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.user("a").map(|u| u.age), Some(20));
    }
}
