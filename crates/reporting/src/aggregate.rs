//! Aggregation engine — KPIs, grouped counts and the daily series over a
//! filtered click/transaction set.

use std::collections::BTreeMap;

use campaign_core::types::{AttributedClick, Transaction};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::buckets::AgeBucket;
use crate::filter::Dimension;

/// Observed value → occurrences, in first-encountered order.
pub type GroupedCounts = IndexMap<String, u64>;
/// Observed value → summed amount, in first-encountered order.
pub type GroupedSums = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub clicks: u64,
    pub conversions: u64,
}

/// Everything the dashboard renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_volume: f64,
    pub average_volume: f64,
    pub total_reached: u64,
    /// Percentage of clicks that converted.
    pub conversion_rate: f64,
    /// Percentage of reached users that clicked.
    pub click_through_rate: f64,
    pub clicks_by_channel: GroupedCounts,
    pub clicks_by_gender: GroupedCounts,
    pub clicks_by_customer_type: GroupedCounts,
    pub clicks_by_send_country: GroupedCounts,
    pub clicks_by_device_info: GroupedCounts,
    pub clicks_by_platform_type: GroupedCounts,
    /// All buckets in fixed order, including empty ones.
    pub clicks_by_age_bucket: GroupedCounts,
    pub volume_by_channel: GroupedSums,
    pub conversions_by_channel: GroupedCounts,
    pub daily: Vec<DailyPoint>,
}

/// `numerator / denominator` as a percentage in `[0, 100]`; 0 when the
/// denominator is 0.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 100.0).min(100.0)
}

/// Count clicks per value of `dimension`.
pub fn group_counts(clicks: &[AttributedClick], dimension: Dimension) -> GroupedCounts {
    let mut counts = GroupedCounts::new();
    for click in clicks {
        *counts.entry(dimension.value_of(click).to_string()).or_insert(0) += 1;
    }
    counts
}

fn age_bucket_counts(clicks: &[AttributedClick]) -> GroupedCounts {
    let mut counts: GroupedCounts = AgeBucket::ALL
        .iter()
        .map(|b| (b.label().to_string(), 0))
        .collect();
    for click in clicks {
        if let Some(count) = counts.get_mut(AgeBucket::for_age(click.user.age).label()) {
            *count += 1;
        }
    }
    counts
}

fn daily_series(clicks: &[AttributedClick], transactions: &[Transaction]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for click in clicks {
        days.entry(click.timestamp.date_naive()).or_default().0 += 1;
    }
    for trx in transactions {
        days.entry(trx.timestamp.date_naive()).or_default().1 += 1;
    }
    days.into_iter()
        .map(|(date, (clicks, conversions))| DailyPoint {
            date,
            clicks,
            conversions,
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the snapshot for already-filtered clicks and transactions.
///
/// `total_reached` is the dataset-wide reach used as the click-through
/// denominator. Holds no state between calls.
pub fn aggregate(
    clicks: &[AttributedClick],
    transactions: &[Transaction],
    total_reached: usize,
) -> AnalyticsSnapshot {
    let total_clicks = clicks.len() as u64;
    let total_conversions = transactions.len() as u64;
    let total_volume: f64 = transactions.iter().map(|t| t.trx_volume).sum();

    let mut volume_by_channel = GroupedSums::new();
    let mut conversions_by_channel = GroupedCounts::new();
    for trx in transactions {
        let key = trx.channel.as_str().to_string();
        *volume_by_channel.entry(key.clone()).or_insert(0.0) += trx.trx_volume;
        *conversions_by_channel.entry(key).or_insert(0) += 1;
    }
    for volume in volume_by_channel.values_mut() {
        *volume = round_cents(*volume);
    }

    AnalyticsSnapshot {
        total_clicks,
        total_conversions,
        total_volume: round_cents(total_volume),
        average_volume: if total_conversions > 0 {
            round_cents(total_volume / total_conversions as f64)
        } else {
            0.0
        },
        total_reached: total_reached as u64,
        conversion_rate: percentage(total_conversions, total_clicks),
        click_through_rate: percentage(total_clicks, total_reached as u64),
        clicks_by_channel: group_counts(clicks, Dimension::Channel),
        clicks_by_gender: group_counts(clicks, Dimension::Gender),
        clicks_by_customer_type: group_counts(clicks, Dimension::CustomerType),
        clicks_by_send_country: group_counts(clicks, Dimension::SendCountry),
        clicks_by_device_info: group_counts(clicks, Dimension::DeviceInfo),
        clicks_by_platform_type: group_counts(clicks, Dimension::PlatformType),
        clicks_by_age_bucket: age_bucket_counts(clicks),
        volume_by_channel,
        conversions_by_channel,
        daily: daily_series(clicks, transactions),
    }
}
