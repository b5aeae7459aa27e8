use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CAMPAIGN_INSIGHTS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// Conversion simulation parameters. Validated by the attribution crate
/// before use.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_conversion_rate")]
    pub rate: f64,
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,
    #[serde(default = "default_max_volume")]
    pub max_volume: f64,
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: i64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: i64,
    /// Fixed seed for reproducible runs. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Synthetic dataset used when no input files are configured.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleConfig {
    #[serde(default = "default_sample_users")]
    pub users: usize,
    #[serde(default = "default_events_per_user")]
    pub events_per_user: usize,
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_sample_seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub users_path: Option<String>,
    #[serde(default)]
    pub events_path: Option<String>,
}

// Default functions
fn default_conversion_rate() -> f64 {
    0.4
}
fn default_min_volume() -> f64 {
    50.0
}
fn default_max_volume() -> f64 {
    800.0
}
fn default_min_delay_secs() -> i64 {
    60
}
fn default_max_delay_secs() -> i64 {
    24 * 60 * 60
}
fn default_sample_users() -> usize {
    1000
}
fn default_events_per_user() -> usize {
    5
}
fn default_window_days() -> i64 {
    30
}
fn default_sample_seed() -> u64 {
    42
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            rate: default_conversion_rate(),
            min_volume: default_min_volume(),
            max_volume: default_max_volume(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            seed: None,
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            users: default_sample_users(),
            events_per_user: default_events_per_user(),
            window_days: default_window_days(),
            seed: default_sample_seed(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional config file.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
