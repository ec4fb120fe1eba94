use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, SkytrailError};
use crate::filter::FilterConfig;
use crate::geo::Geofence;

pub const CONFIG_ENV: &str = "SKYTRAIL_CONFIG";

/// What the animator does with a projected position that left the geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// always commit the projected position and extend the trail
    AlwaysCommit,
    /// keep the last in-region position and trail, aircraft stays in the active set
    #[default]
    FreezeOutside,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub source_url: String,
    pub fetch_timeout_secs: u64,
    pub ingest_period_secs: u64,
    pub animate_period_secs: u64,
    pub max_tracked: usize,
    pub geofence: Geofence,
    pub boundary_policy: BoundaryPolicy,
    pub filter: FilterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            source_url: "https://api.adsb.lol/v2/lat/22.5/lon/78.9/dist/1000".to_string(),
            fetch_timeout_secs: 8,
            ingest_period_secs: 30,
            animate_period_secs: 1,
            max_tracked: 200,
            geofence: Geofence::default(),
            boundary_policy: BoundaryPolicy::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file named by `SKYTRAIL_CONFIG` (defaults if unset), then apply `PORT`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };
        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| SkytrailError::Config(format!("invalid PORT {port}")))?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingest_period_secs == 0 || self.animate_period_secs == 0 {
            return Err(SkytrailError::Config("periods must be non-zero".to_string()));
        }
        if self.max_tracked == 0 {
            return Err(SkytrailError::Config("max_tracked must be non-zero".to_string()));
        }
        if !self.geofence.is_valid() {
            return Err(SkytrailError::Config(format!("invalid geofence {:?}", self.geofence)));
        }
        Ok(())
    }

    pub fn ingest_period(&self) -> Duration {
        Duration::from_secs(self.ingest_period_secs)
    }

    pub fn animate_period(&self) -> Duration {
        Duration::from_secs(self.animate_period_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
