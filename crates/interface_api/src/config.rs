//! Portal configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use domain_claims::SimulatorConfig;

/// Portal server configuration
///
/// Every field has a default, so an empty environment yields a working
/// in-memory server on port 8080.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub log_json: bool,
    /// Claim document path; claims are kept in memory when unset
    pub store_path: Option<PathBuf>,
    /// Delay before an auto-started run begins
    pub auto_start_delay_ms: u64,
    /// Delay before the commercial flow returns to the dashboard
    pub commercial_redirect_secs: u64,
    /// In-stage progress per simulator tick, in percent
    pub tick_increment_pct: u8,
    /// How long a run that is not processing may sit untouched before eviction
    pub run_idle_ttl_secs: u64,
    /// How often the idle-run sweeper wakes
    pub run_sweep_interval_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            store_path: None,
            auto_start_delay_ms: 1_000,
            commercial_redirect_secs: 15,
            tick_increment_pct: domain_claims::simulator::DEFAULT_TICK_INCREMENT_PCT,
            run_idle_ttl_secs: 600,
            run_sweep_interval_secs: 60,
        }
    }
}

impl PortalConfig {
    /// Loads configuration from `PORTAL_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("PORTAL").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_start_delay_ms)
    }

    pub fn run_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.run_idle_ttl_secs)
    }

    pub fn run_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.run_sweep_interval_secs.max(1))
    }

    pub fn commercial_redirect_millis(&self) -> u64 {
        self.commercial_redirect_secs.saturating_mul(1_000)
    }

    /// Simulator settings for new runs
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            tick_increment_pct: self.tick_increment_pct,
            seed: None,
        }
    }
}
