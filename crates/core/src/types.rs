use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer known to the campaign platform. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub gender: String,
    pub age: u8,
    pub send_country: String,
    pub receive_country: String,
    pub customer_type: CustomerType,
    pub device_info: DeviceInfo,
    pub platform_type: PlatformType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Active,
    Dormant,
    Churned,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dormant => "dormant",
            Self::Churned => "churned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceInfo {
    #[serde(rename = "iOS")]
    Ios,
    Android,
}

impl DeviceInfo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    App,
    Website,
}

impl PlatformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Website => "website",
        }
    }
}

/// Engagement channel a message was delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Push,
    Popup,
    Slider,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::Popup => "Popup",
            Self::Slider => "Slider",
        }
    }

    pub fn clicked_event(&self) -> EventName {
        match self {
            Self::Push => EventName::PushClicked,
            Self::Popup => EventName::PopupClicked,
            Self::Slider => EventName::SliderClicked,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    PushReceived,
    PopupReceived,
    SliderReceived,
    PushClicked,
    PopupClicked,
    SliderClicked,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PushReceived => "push_received",
            Self::PopupReceived => "popup_received",
            Self::SliderReceived => "slider_received",
            Self::PushClicked => "push_clicked",
            Self::PopupClicked => "popup_clicked",
            Self::SliderClicked => "slider_clicked",
        }
    }

    /// True for the `*_clicked` events that qualify for attribution.
    pub fn is_click(&self) -> bool {
        self.as_str().ends_with("_clicked")
    }

    /// True for the `*_received` events that count towards reach.
    pub fn is_received(&self) -> bool {
        self.as_str().ends_with("_received")
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::PushReceived | Self::PushClicked => Channel::Push,
            Self::PopupReceived | Self::PopupClicked => Channel::Popup,
            Self::SliderReceived | Self::SliderClicked => Channel::Slider,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw engagement event. `user_id` may reference a user that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_name: EventName,
}

/// The first click of a user, merged with the user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedClick {
    #[serde(flatten)]
    pub user: User,
    pub channel: Channel,
    pub timestamp: DateTime<Utc>,
}

impl AttributedClick {
    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }
}

/// A simulated purchase following an attributed click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub user_id: String,
    pub channel: Channel,
    pub trx_volume: f64,
    pub timestamp: DateTime<Utc>,
}
