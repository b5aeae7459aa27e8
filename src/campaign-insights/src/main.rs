//! Campaign Insights — first-touch click attribution, conversion simulation
//! and filterable engagement analytics.
//!
//! Loads users and events (or generates a sample), builds the dataset once,
//! applies the requested filters and prints the dashboard view as JSON.

mod input;
mod sample;

use std::path::{Path, PathBuf};

use campaign_attribution::{ConversionParams, EventStore};
use campaign_core::config::AppConfig;
use campaign_core::types::{Event, User};
use campaign_reporting::{CampaignDashboard, Dataset, DateRange, Dimension};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "First-touch attribution and engagement analytics")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, env = "CAMPAIGN_INSIGHTS_CONFIG")]
    config: Option<String>,

    /// Users JSON file (array of users)
    #[arg(long, requires = "events")]
    users: Option<PathBuf>,

    /// Events JSON file (array of events)
    #[arg(long, requires = "users")]
    events: Option<PathBuf>,

    /// Number of sample users when no input files are given (overrides config)
    #[arg(long)]
    sample_users: Option<usize>,

    /// Conversion simulation seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// First day to include, YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,

    /// Last day to include, YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    device: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    #[arg(long)]
    customer_type: Option<String>,

    #[arg(long)]
    gender: Option<String>,

    /// Chart segment click as DIMENSION=VALUE; repeat to click again
    #[arg(long = "drill", value_parser = parse_segment)]
    drills: Vec<(Dimension, String)>,

    /// Print the available selector values instead of the view
    #[arg(long, default_value_t = false)]
    options: bool,

    /// Print only the analytics snapshot
    #[arg(long, default_value_t = false)]
    summary: bool,

    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    /// Selector value given for a categorical dimension, if any.
    fn selection(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::SendCountry => &self.country,
            Dimension::DeviceInfo => &self.device,
            Dimension::PlatformType => &self.platform,
            Dimension::CustomerType => &self.customer_type,
            Dimension::Gender => &self.gender,
            Dimension::Channel | Dimension::AgeBucket => &None,
        };
        value.as_deref()
    }
}

fn parse_segment(raw: &str) -> Result<(Dimension, String), String> {
    let (dimension, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DIMENSION=VALUE, got '{raw}'"))?;
    let dimension: Dimension = dimension.parse().map_err(|e| format!("{e}"))?;
    Ok((dimension, value.to_string()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_insights=info,campaign_attribution=info,campaign_reporting=info".into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.conversion.seed = Some(seed);
    }
    if let Some(users) = cli.sample_users {
        config.sample.users = users;
    }
    if let Some(path) = &cli.users {
        config.dataset.users_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.events {
        config.dataset.events_path = Some(path.display().to_string());
    }

    let (users, events): (Vec<User>, Vec<Event>) =
        match (&config.dataset.users_path, &config.dataset.events_path) {
            (Some(users), Some(events)) => (
                input::load_json_array(Path::new(users))?,
                input::load_json_array(Path::new(events))?,
            ),
            _ => {
                info!(
                    users = config.sample.users,
                    seed = config.sample.seed,
                    "No input files configured, generating sample data"
                );
                sample::generate(&config.sample, Utc::now())
            }
        };

    let params = ConversionParams::from_config(&config.conversion)?;
    let mut rng = match config.conversion.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = Dataset::build(EventStore::new(users, events), &params, &mut rng);

    if cli.options {
        print_json(&dataset.filter_options(), cli.pretty)?;
        return Ok(());
    }

    let mut dashboard = CampaignDashboard::new(&dataset);
    if cli.from.is_some() || cli.to.is_some() {
        dashboard.set_date_range(DateRange::parse(cli.from.as_deref(), cli.to.as_deref()));
    }
    for dimension in Dimension::CATEGORICAL {
        if let Some(value) = cli.selection(dimension) {
            dashboard.select(dimension, value);
        }
    }
    // Segment clicks come last so selector changes do not clear them.
    for (dimension, value) in &cli.drills {
        dashboard.click_segment(*dimension, value);
    }

    let view = dashboard.view();
    info!(
        clicks = view.snapshot.total_clicks,
        conversions = view.snapshot.total_conversions,
        drill_down = view.criteria.drill_down.is_active(),
        "Dashboard view ready"
    );

    if cli.summary {
        print_json(&view.snapshot, cli.pretty)
    } else {
        print_json(&view, cli.pretty)
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
