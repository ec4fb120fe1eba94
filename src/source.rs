use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::Result;

/// One untrusted aircraft record as delivered by the external feed. Every field is kept as a
/// raw JSON value and validated by the ingestor.
///
/// Feeds disagree on names (`id`/`hex`/`icao24`, `flight`, `alt_baro`, `gs`, `track`) and some
/// send more than one of them, so each naming gets its own slot and the accessors pick one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    id: Option<Value>,
    hex: Option<Value>,
    icao24: Option<Value>,
    callsign: Option<Value>,
    flight: Option<Value>,
    pub lat: Option<Value>,
    pub lon: Option<Value>,
    altitude: Option<Value>,
    alt_baro: Option<Value>,
    velocity: Option<Value>,
    gs: Option<Value>,
    heading: Option<Value>,
    track: Option<Value>,
    pub on_ground: Option<Value>,
    pub origin: Option<Value>,
    pub destination: Option<Value>,
}

impl RawRecord {
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref().or(self.hex.as_ref()).or(self.icao24.as_ref())
    }

    pub fn callsign(&self) -> Option<&Value> {
        self.callsign.as_ref().or(self.flight.as_ref())
    }

    pub fn altitude(&self) -> Option<&Value> {
        self.altitude.as_ref().or(self.alt_baro.as_ref())
    }

    pub fn velocity(&self) -> Option<&Value> {
        self.velocity.as_ref().or(self.gs.as_ref())
    }

    pub fn heading(&self) -> Option<&Value> {
        self.heading.as_ref().or(self.track.as_ref())
    }
}

/// Feed response: the original backend wraps records in `planes`, adsb.lol v2 in `ac`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    planes: Option<Vec<Value>>,
    ac: Option<Vec<Value>>,
}

impl RawSnapshot {
    pub fn from_records(records: Vec<Value>) -> Self {
        RawSnapshot { planes: Some(records), ac: None }
    }

    pub fn into_records(self) -> Option<Vec<Value>> {
        self.planes.or(self.ac)
    }
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<RawSnapshot>;
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Skytrail/0.1.0")
            .build()?;
        Ok(HttpSource { client, url: url.into() })
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        info!("Fetching snapshot from: {}", self.url);
        // decode failures surface as MalformedSnapshot, see From<reqwest::Error>
        let resp = self.client.get(&self.url).send().await?.error_for_status()?;
        let snapshot: RawSnapshot = resp.json().await?;
        Ok(snapshot)
    }
}
