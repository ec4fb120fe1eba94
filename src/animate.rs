use crate::aircraft::Aircraft;
use crate::config::BoundaryPolicy;
use crate::geo::{Geofence, project};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub moved: usize,
    pub frozen: usize,
    pub resting: usize,
}

/// Advance one aircraft by `dt` seconds. Returns whether a new position was committed.
pub fn advance(
    ac: &mut Aircraft,
    dt: f64,
    geofence: &Geofence,
    policy: BoundaryPolicy,
) -> Option<bool> {
    if !ac.is_moving() {
        return None;
    }
    let next = project(Some(ac.position), Some(ac.heading), ac.velocity, dt)?;

    if policy == BoundaryPolicy::FreezeOutside && !geofence.contains_position(&next) {
        return Some(false);
    }
    ac.move_to(next);
    Some(true)
}

/// One animation tick over the whole active set.
pub fn tick(
    aircraft: &mut [Aircraft],
    dt: f64,
    geofence: &Geofence,
    policy: BoundaryPolicy,
) -> TickStats {
    let mut stats = TickStats::default();
    for ac in aircraft.iter_mut() {
        match advance(ac, dt, geofence, policy) {
            Some(true) => stats.moved += 1,
            Some(false) => stats.frozen += 1,
            None => stats.resting += 1,
        }
    }
    stats
}
