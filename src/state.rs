use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aircraft::Aircraft;
use crate::filter::FilterConfig;

#[derive(Debug, Default)]
struct Inner {
    aircraft: Vec<Aircraft>,
    version: u64,
    last_ingest: Option<DateTime<Utc>>,
    filter: FilterConfig,
    selected: Option<String>,
}

/// Point-in-time copy of the active set handed out to readers.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSnapshot {
    pub version: u64,
    pub last_ingest: Option<DateTime<Utc>>,
    pub aircraft: Vec<Aircraft>,
}

/// Counters for the status view, all read under one guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub last_ingest: Option<DateTime<Utc>>,
    pub version: u64,
    pub active: usize,
    pub visible: usize,
}

/// The single owned active set. Ingestor and animator are the only writers and each holds the
/// write lock for its whole update, so readers never observe a half-applied cycle.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    inner: Arc<RwLock<Inner>>,
}

impl LiveState {
    pub fn new(filter: FilterConfig) -> Self {
        LiveState {
            inner: Arc::new(RwLock::new(Inner { filter, ..Inner::default() })),
        }
    }

    // a writer that panicked mid-update must not take the readers down with it
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn replace(&self, aircraft: Vec<Aircraft>, at: DateTime<Utc>) -> u64 {
        let mut inner = self.write();
        inner.aircraft = aircraft;
        inner.last_ingest = Some(at);
        inner.version += 1;
        inner.version
    }

    /// Run `f` over the active set under the write lock and bump the version.
    pub fn update<R>(&self, f: impl FnOnce(&mut [Aircraft]) -> R) -> R {
        let mut inner = self.write();
        let result = f(inner.aircraft.as_mut_slice());
        inner.version += 1;
        result
    }

    pub fn snapshot(&self) -> ActiveSnapshot {
        let inner = self.read();
        ActiveSnapshot {
            version: inner.version,
            last_ingest: inner.last_ingest,
            aircraft: inner.aircraft.clone(),
        }
    }

    pub fn visible(&self) -> Vec<Aircraft> {
        let inner = self.read();
        inner.filter.apply(&inner.aircraft)
    }

    pub fn status(&self) -> Status {
        let inner = self.read();
        Status {
            last_ingest: inner.last_ingest,
            version: inner.version,
            active: inner.aircraft.len(),
            visible: inner.aircraft.iter().filter(|ac| inner.filter.matches(ac)).count(),
        }
    }

    pub fn filter(&self) -> FilterConfig {
        self.read().filter.clone()
    }

    pub fn set_filter(&self, filter: FilterConfig) {
        self.write().filter = filter;
    }

    pub fn select(&self, id: &str) -> bool {
        let mut inner = self.write();
        if inner.aircraft.iter().any(|ac| ac.id == id) {
            inner.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&self) {
        self.write().selected = None;
    }

    /// The focused aircraft, if it is still part of the active set.
    pub fn selected(&self) -> Option<Aircraft> {
        let inner = self.read();
        let id = inner.selected.as_deref()?;
        inner.aircraft.iter().find(|ac| ac.id == id).cloned()
    }

    pub fn version(&self) -> u64 {
        self.read().version
    }

    pub fn last_ingest(&self) -> Option<DateTime<Utc>> {
        self.read().last_ingest
    }

    pub fn len(&self) -> usize {
        self.read().aircraft.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;

    #[test]
    fn test_replace_bumps_version() {
        let state = LiveState::default();
        assert_eq!(state.version(), 0);
        assert!(state.last_ingest().is_none());

        let now = Utc::now();
        let v = state.replace(vec![Aircraft::new("a", Position::new(20.0, 80.0))], now);
        assert_eq!(v, 1);
        assert_eq!(state.last_ingest(), Some(now));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let state = LiveState::default();
        state.replace(vec![Aircraft::new("a", Position::new(20.0, 80.0))], Utc::now());
        let snap = state.snapshot();
        state.update(|aircraft| aircraft[0].move_to(Position::new(21.0, 80.0)));

        assert_eq!(snap.aircraft[0].position, Position::new(20.0, 80.0));
        assert_eq!(state.snapshot().aircraft[0].position, Position::new(21.0, 80.0));
        assert_eq!(state.version(), snap.version + 1);
    }

    #[test]
    fn test_selection_follows_active_set() {
        let state = LiveState::default();
        state.replace(vec![Aircraft::new("a", Position::new(20.0, 80.0))], Utc::now());
        assert!(!state.select("b"));
        assert!(state.select("a"));
        assert_eq!(state.selected().map(|ac| ac.id), Some("a".to_string()));

        state.replace(vec![Aircraft::new("c", Position::new(20.0, 80.0))], Utc::now());
        assert!(state.selected().is_none());

        state.clear_selection();
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_visible_applies_filter() {
        let mut high = Aircraft::new("high", Position::new(20.0, 80.0));
        high.altitude = Some(30000.0);
        let low = Aircraft::new("low", Position::new(20.0, 80.0));

        let state = LiveState::new(FilterConfig { min_altitude: 1000.0, ..Default::default() });
        state.replace(vec![high, low], Utc::now());
        assert_eq!(state.visible().len(), 1);

        state.set_filter(FilterConfig::default());
        assert_eq!(state.visible().len(), 2);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_status_counts_against_current_filter() {
        let mut high = Aircraft::new("high", Position::new(20.0, 80.0));
        high.altitude = Some(30000.0);
        let low = Aircraft::new("low", Position::new(20.0, 80.0));

        let state = LiveState::default();
        let status = state.status();
        assert_eq!((status.active, status.visible, status.version), (0, 0, 0));
        assert!(status.last_ingest.is_none());

        let now = Utc::now();
        state.replace(vec![high, low], now);
        state.set_filter(FilterConfig { min_altitude: 1000.0, ..Default::default() });

        let status = state.status();
        assert_eq!(status.last_ingest, Some(now));
        assert_eq!(status.version, 1);
        assert_eq!(status.active, 2);
        assert_eq!(status.visible, state.visible().len());
        assert_eq!(status.visible, 1);
    }
}
