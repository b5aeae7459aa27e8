//! Seeded synthetic users and events for running without input files.

use campaign_core::config::SampleConfig;
use campaign_core::types::{CustomerType, DeviceInfo, Event, EventName, PlatformType, User};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const COUNTRIES: [&str; 6] = ["US", "UK", "AE", "DE", "CA", "AU"];
const RECEIVE_COUNTRIES: [&str; 5] = ["IN", "PH", "MX", "NG", "PK"];
const GENDERS: [&str; 2] = ["Male", "Female"];
const CUSTOMER_TYPES: [CustomerType; 3] = [
    CustomerType::Active,
    CustomerType::Dormant,
    CustomerType::Churned,
];
const RECEIVED: [EventName; 3] = [
    EventName::PushReceived,
    EventName::PopupReceived,
    EventName::SliderReceived,
];

const CLICK_PROBABILITY: f64 = 0.3;
const DANGLING_PROBABILITY: f64 = 0.02;

/// Generate users and their received/clicked events inside the
/// `window_days` before `end`.
pub fn generate(config: &SampleConfig, end: DateTime<Utc>) -> (Vec<User>, Vec<Event>) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let window_secs = (config.window_days.max(1) * 86_400).max(1);
    let start = end - Duration::seconds(window_secs);

    let users: Vec<User> = (0..config.users)
        .map(|i| User {
            user_id: format!("user_{i:05}"),
            gender: GENDERS
                .choose(&mut rng)
                .copied()
                .unwrap_or_default()
                .to_string(),
            age: rng.gen_range(18..=65),
            send_country: COUNTRIES
                .choose(&mut rng)
                .copied()
                .unwrap_or_default()
                .to_string(),
            receive_country: RECEIVE_COUNTRIES
                .choose(&mut rng)
                .copied()
                .unwrap_or_default()
                .to_string(),
            customer_type: CUSTOMER_TYPES
                .choose(&mut rng)
                .copied()
                .unwrap_or(CustomerType::Active),
            device_info: if rng.gen_bool(0.5) {
                DeviceInfo::Ios
            } else {
                DeviceInfo::Android
            },
            platform_type: if rng.gen_bool(0.5) {
                PlatformType::App
            } else {
                PlatformType::Website
            },
        })
        .collect();

    let mut events = Vec::with_capacity(config.users * config.events_per_user * 2);
    let mut next_id = 0usize;
    let mut push =
        |events: &mut Vec<Event>, user_id: &str, name: EventName, timestamp: DateTime<Utc>| {
            events.push(Event {
                event_id: format!("evt_{next_id:07}"),
                user_id: user_id.to_string(),
                timestamp,
                event_name: name,
            });
            next_id += 1;
        };

    for user in &users {
        for _ in 0..config.events_per_user {
            let user_id = if rng.gen_bool(DANGLING_PROBABILITY) {
                format!("unknown_{}", rng.gen_range(0..1000))
            } else {
                user.user_id.clone()
            };
            let received = RECEIVED
                .choose(&mut rng)
                .copied()
                .unwrap_or(EventName::PushReceived);
            let at = start + Duration::seconds(rng.gen_range(0..window_secs));
            push(&mut events, &user_id, received, at);

            if rng.gen_bool(CLICK_PROBABILITY) {
                let clicked = received.channel().clicked_event();
                let delay = Duration::seconds(rng.gen_range(1..=3_600));
                push(&mut events, &user_id, clicked, at + delay);
            }
        }
    }

    (users, events)
}
