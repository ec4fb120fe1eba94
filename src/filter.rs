use serde::{Deserialize, Serialize};

use crate::aircraft::Aircraft;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_altitude: f64,
    pub airborne_only: bool,
    pub ground_only: bool,
    pub airline_prefix: Option<String>,
}

impl FilterConfig {
    /// Unknown altitude counts as 0. `airborne_only` together with `ground_only` matches nothing.
    pub fn matches(&self, ac: &Aircraft) -> bool {
        if ac.altitude.unwrap_or(0.0) < self.min_altitude {
            return false;
        }
        if self.airborne_only && ac.on_ground {
            return false;
        }
        if self.ground_only && !ac.on_ground {
            return false;
        }
        match self.airline_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => ac.callsign.starts_with(prefix),
            _ => true,
        }
    }

    pub fn apply<'a>(&self, aircraft: impl IntoIterator<Item = &'a Aircraft>) -> Vec<Aircraft> {
        aircraft.into_iter().filter(|ac| self.matches(ac)).cloned().collect()
    }
}
