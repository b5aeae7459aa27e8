//! Filter engine — predicate sets over attributed clicks, the transitive
//! transaction filter, and the interactive filter state.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use campaign_core::error::CampaignError;
use campaign_core::types::{AttributedClick, Transaction};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buckets::AgeBucket;

/// Selector value that imposes no constraint.
pub const ALL: &str = "all";

/// A click attribute that can be filtered or drilled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Channel,
    Gender,
    CustomerType,
    SendCountry,
    DeviceInfo,
    PlatformType,
    #[serde(rename = "age")]
    AgeBucket,
}

impl Dimension {
    /// Dimensions offered as selectors, as opposed to chart-only ones.
    pub const CATEGORICAL: [Dimension; 5] = [
        Dimension::SendCountry,
        Dimension::DeviceInfo,
        Dimension::PlatformType,
        Dimension::CustomerType,
        Dimension::Gender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Gender => "gender",
            Self::CustomerType => "customer_type",
            Self::SendCountry => "send_country",
            Self::DeviceInfo => "device_info",
            Self::PlatformType => "platform_type",
            Self::AgeBucket => "age",
        }
    }

    /// The value this dimension takes for a click.
    pub fn value_of<'a>(&self, click: &'a AttributedClick) -> &'a str {
        let user = &click.user;
        match self {
            Self::Channel => click.channel.as_str(),
            Self::Gender => &user.gender,
            Self::CustomerType => user.customer_type.as_str(),
            Self::SendCountry => &user.send_country,
            Self::DeviceInfo => user.device_info.as_str(),
            Self::PlatformType => user.platform_type.as_str(),
            Self::AgeBucket => AgeBucket::for_age(user.age).label(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "channel" => Ok(Self::Channel),
            "gender" => Ok(Self::Gender),
            "customer_type" => Ok(Self::CustomerType),
            "send_country" | "country" => Ok(Self::SendCountry),
            "device_info" | "device" => Ok(Self::DeviceInfo),
            "platform_type" | "platform" => Ok(Self::PlatformType),
            "age" | "age_bucket" => Ok(Self::AgeBucket),
            other => Err(CampaignError::InvalidParameter(format!(
                "unknown dimension '{other}'"
            ))),
        }
    }
}

/// Calendar-day range; both ends inclusive, the end covering its whole day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` bounds. A bound that is missing or does not parse
    /// imposes no constraint.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        };
        Self {
            start: parse(start),
            end: parse(end),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }
}

/// Segment selected by clicking an aggregate chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DrillDown {
    #[default]
    None,
    Active { dimension: Dimension, value: String },
}

impl DrillDown {
    /// Clicking the active segment again clears it; any other segment
    /// replaces it.
    pub fn toggle(&self, dimension: Dimension, value: &str) -> DrillDown {
        match self {
            DrillDown::Active {
                dimension: current,
                value: current_value,
            } if *current == dimension && current_value == value => DrillDown::None,
            _ => DrillDown::Active {
                dimension,
                value: value.to_string(),
            },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DrillDown::Active { .. })
    }
}

/// A single condition a click must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Date(DateRange),
    Equals { dimension: Dimension, value: String },
}

impl Predicate {
    pub fn matches(&self, click: &AttributedClick) -> bool {
        match self {
            Predicate::Date(range) => range.contains(click.timestamp),
            Predicate::Equals { dimension, value } => dimension.value_of(click) == value,
        }
    }
}

/// Conjunction of the active date range, selector values and drill-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub selections: IndexMap<Dimension, String>,
    #[serde(default)]
    pub drill_down: DrillDown,
}

impl FilterCriteria {
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Constrain `dimension` to `value`; the `all` sentinel or an empty
    /// value removes the constraint.
    pub fn with_selection(mut self, dimension: Dimension, value: &str) -> Self {
        set_selection(&mut self.selections, dimension, value);
        self
    }

    pub fn with_drill_down(mut self, dimension: Dimension, value: &str) -> Self {
        self.drill_down = self.drill_down.toggle(dimension, value);
        self
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if !self.date_range.is_unbounded() {
            predicates.push(Predicate::Date(self.date_range));
        }
        for (dimension, value) in &self.selections {
            predicates.push(Predicate::Equals {
                dimension: *dimension,
                value: value.clone(),
            });
        }
        if let DrillDown::Active { dimension, value } = &self.drill_down {
            predicates.push(Predicate::Equals {
                dimension: *dimension,
                value: value.clone(),
            });
        }
        predicates
    }
}

fn set_selection(selections: &mut IndexMap<Dimension, String>, dimension: Dimension, value: &str) {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
        selections.shift_remove(&dimension);
    } else {
        selections.insert(dimension, value.to_string());
    }
}

/// Clicks satisfying every predicate of `criteria`, in input order.
pub fn filter_clicks<'a>(
    clicks: impl IntoIterator<Item = &'a AttributedClick>,
    criteria: &FilterCriteria,
) -> Vec<AttributedClick> {
    let predicates = criteria.predicates();
    clicks
        .into_iter()
        .filter(|click| predicates.iter().all(|p| p.matches(click)))
        .cloned()
        .collect()
}

/// User ids of a filtered click set.
pub fn allowed_user_ids(clicks: &[AttributedClick]) -> HashSet<&str> {
    clicks.iter().map(|c| c.user_id()).collect()
}

/// Transactions whose user survived click filtering.
pub fn filter_transactions<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    allowed_user_ids: &HashSet<&str>,
) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| allowed_user_ids.contains(t.user_id.as_str()))
        .cloned()
        .collect()
}

/// Interactive filter state owned by the controlling caller.
///
/// Any change to the date range or a selector clears the drill-down.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    criteria: FilterCriteria,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn drill_down(&self) -> &DrillDown {
        &self.criteria.drill_down
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.criteria.date_range = range;
        self.clear_drill_down();
    }

    pub fn select(&mut self, dimension: Dimension, value: &str) {
        set_selection(&mut self.criteria.selections, dimension, value);
        self.clear_drill_down();
    }

    pub fn toggle_drill_down(&mut self, dimension: Dimension, value: &str) {
        self.criteria.drill_down = self.criteria.drill_down.toggle(dimension, value);
        debug!(
            dimension = %dimension,
            value,
            active = self.criteria.drill_down.is_active(),
            "Drill-down toggled"
        );
    }

    /// Back to no filtering at all.
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    fn clear_drill_down(&mut self) {
        if self.criteria.drill_down.is_active() {
            debug!("Broader filter changed, drill-down cleared");
        }
        self.criteria.drill_down = DrillDown::None;
    }
}
