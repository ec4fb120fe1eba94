use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::animate;
use crate::config::{BoundaryPolicy, Config};
use crate::errors::{Result, SkytrailError};
use crate::geo::Geofence;
use crate::ingest::ingest;
use crate::source::SnapshotSource;
use crate::state::LiveState;

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub geofence: Geofence,
    pub max_tracked: usize,
    pub ingest_period: Duration,
    pub animate_period: Duration,
    pub boundary_policy: BoundaryPolicy,
}

impl From<&Config> for TrackerSettings {
    fn from(config: &Config) -> Self {
        TrackerSettings {
            geofence: config.geofence,
            max_tracked: config.max_tracked,
            ingest_period: config.ingest_period(),
            animate_period: config.animate_period(),
            boundary_policy: config.boundary_policy,
        }
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.join.await;
    }
}

/// Owns the two periodic cycles (snapshot ingestion and animation) that drive a `LiveState`.
pub struct Tracker {
    state: LiveState,
    source: Arc<dyn SnapshotSource>,
    settings: TrackerSettings,
    ingestor: Option<WorkerHandle>,
    animator: Option<WorkerHandle>,
}

impl Tracker {
    pub fn new(
        state: LiveState,
        source: Arc<dyn SnapshotSource>,
        settings: TrackerSettings,
    ) -> Self {
        Tracker { state, source, settings, ingestor: None, animator: None }
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.ingestor.is_some() || self.animator.is_some()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(SkytrailError::Config("tracker already running".to_string()));
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_ingest_loop(
            self.state.clone(),
            self.source.clone(),
            self.settings.clone(),
            stop_rx,
        ));
        self.ingestor = Some(WorkerHandle { stop_tx, join });

        let (stop_tx, stop_rx) = oneshot::channel();
        let join =
            tokio::spawn(run_animate_loop(self.state.clone(), self.settings.clone(), stop_rx));
        self.animator = Some(WorkerHandle { stop_tx, join });

        info!(
            "tracker started: ingest every {:?}, animate every {:?}",
            self.settings.ingest_period, self.settings.animate_period
        );
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.ingestor.take() {
            worker.stop().await;
        }
        if let Some(worker) = self.animator.take() {
            worker.stop().await;
        }
        info!("tracker stopped");
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        for worker in [self.ingestor.take(), self.animator.take()].into_iter().flatten() {
            worker.join.abort();
        }
    }
}

/// Fetch and ingest one snapshot. On any failure the active set is left untouched.
pub async fn ingest_cycle(
    state: &LiveState,
    source: &dyn SnapshotSource,
    settings: &TrackerSettings,
) -> Result<usize> {
    let snapshot = source.fetch().await?;
    let aircraft = ingest(snapshot, &settings.geofence, settings.max_tracked)?;
    let count = aircraft.len();
    let version = state.replace(aircraft, Utc::now());
    debug!("active set replaced: {} aircraft, version {}", count, version);
    Ok(count)
}

pub fn animate_cycle(state: &LiveState, settings: &TrackerSettings) -> animate::TickStats {
    let dt = settings.animate_period.as_secs_f64();
    let policy = settings.boundary_policy;
    state.update(|aircraft| animate::tick(aircraft, dt, &settings.geofence, policy))
}

async fn run_ingest_loop(
    state: LiveState,
    source: Arc<dyn SnapshotSource>,
    settings: TrackerSettings,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(settings.ingest_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                // stop must also interrupt a fetch that hangs until its timeout
                tokio::select! {
                    _ = &mut stop_rx => break,
                    result = ingest_cycle(&state, source.as_ref(), &settings) => match result {
                        Ok(_) => {}
                        Err(e @ SkytrailError::SourceUnavailable(_)) => {
                            error!("snapshot fetch failed: {}", e)
                        }
                        Err(e) => warn!("snapshot skipped: {}", e),
                    }
                }
            }
        }
    }
}

async fn run_animate_loop(
    state: LiveState,
    settings: TrackerSettings,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(settings.animate_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                let stats = animate_cycle(&state, &settings);
                if stats.frozen > 0 {
                    debug!("{} aircraft held at geofence edge", stats.frozen);
                }
            }
        }
    }
}
