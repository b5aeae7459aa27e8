//! Conversion simulation — derives transactions from attributed clicks.

use campaign_core::config::ConversionConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{AttributedClick, Transaction};
use chrono::Duration;
use rand::Rng;
use tracing::info;

/// Validated simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionParams {
    rate: f64,
    min_volume: f64,
    max_volume: f64,
    min_delay: Duration,
    max_delay: Duration,
}

impl ConversionParams {
    /// `rate` must lie in `[0, 1]`, volumes must satisfy `0 < min <= max`
    /// with a span the sampler can represent, delays must satisfy
    /// `1ms <= min <= max`.
    pub fn new(
        rate: f64,
        volume: (f64, f64),
        delay: (Duration, Duration),
    ) -> CampaignResult<Self> {
        let (min_volume, max_volume) = volume;
        let (min_delay, max_delay) = delay;

        if !(0.0..=1.0).contains(&rate) {
            return Err(CampaignError::InvalidParameter(format!(
                "conversion rate {rate} is outside [0, 1]"
            )));
        }
        if !(min_volume > 0.0 && min_volume <= max_volume && max_volume.is_finite()) {
            return Err(CampaignError::InvalidParameter(format!(
                "volume range {min_volume}..={max_volume} must be positive and ordered"
            )));
        }
        // Uniform float sampling scales the span by 1 / (1 - EPSILON).
        if !((max_volume - min_volume) / (1.0 - f64::EPSILON)).is_finite() {
            return Err(CampaignError::InvalidParameter(format!(
                "volume range {min_volume}..={max_volume} is too wide to sample"
            )));
        }
        if min_delay < Duration::milliseconds(1) || min_delay > max_delay {
            return Err(CampaignError::InvalidParameter(format!(
                "delay range {}ms..={}ms must be at least 1ms and ordered",
                min_delay.num_milliseconds(),
                max_delay.num_milliseconds()
            )));
        }

        Ok(Self {
            rate,
            min_volume,
            max_volume,
            min_delay,
            max_delay,
        })
    }

    pub fn from_config(config: &ConversionConfig) -> CampaignResult<Self> {
        let seconds = |secs: i64| {
            Duration::try_seconds(secs).ok_or_else(|| {
                CampaignError::InvalidParameter(format!("delay of {secs}s is out of range"))
            })
        };
        Self::new(
            config.rate,
            (config.min_volume, config.max_volume),
            (seconds(config.min_delay_secs)?, seconds(config.max_delay_secs)?),
        )
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

/// Simulate at most one transaction per click.
///
/// Draws, per click and in click order: the conversion decision, then the
/// volume, then the delay. The same generator state therefore always yields
/// the same transactions.
pub fn simulate_conversions<'a, R>(
    clicks: impl IntoIterator<Item = &'a AttributedClick>,
    params: &ConversionParams,
    rng: &mut R,
) -> Vec<Transaction>
where
    R: Rng + ?Sized,
{
    let mut transactions = Vec::new();
    let mut clicks_seen = 0usize;

    for click in clicks {
        clicks_seen += 1;
        if !rng.gen_bool(params.rate) {
            continue;
        }
        let volume = rng.gen_range(params.min_volume..=params.max_volume);
        let delay_ms = rng.gen_range(
            params.min_delay.num_milliseconds()..=params.max_delay.num_milliseconds(),
        );

        transactions.push(Transaction {
            user_id: click.user_id().to_string(),
            channel: click.channel,
            trx_volume: round_cents(volume).clamp(params.min_volume, params.max_volume),
            timestamp: click.timestamp + Duration::milliseconds(delay_ms),
        });
    }

    metrics::counter!("conversion.transactions").increment(transactions.len() as u64);
    info!(
        clicks = clicks_seen,
        transactions = transactions.len(),
        rate = params.rate,
        "Conversion simulation complete"
    );

    transactions
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
