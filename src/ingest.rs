use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::aircraft::{Aircraft, UNKNOWN_AIRPORT, UNKNOWN_CALLSIGN};
use crate::errors::{Result, SkytrailError};
use crate::geo::{Geofence, Position};
use crate::source::{RawRecord, RawSnapshot};
use crate::units::{as_number, normalize_velocity};

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Id given to a record the feed left unnamed. The `#` prefix keeps it apart from any
/// icao24 hex or callsign-style id a feed supplies.
fn fallback_id(index: usize) -> String {
    format!("#{index}")
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    non_empty_string(value).unwrap_or_else(|| default.to_string())
}

/// Map one raw record into a candidate aircraft. `index` is the record's position in the batch
/// and names the aircraft when the feed supplies no id.
pub fn build_aircraft(index: usize, raw: &Value, geofence: &Geofence) -> Result<Aircraft> {
    let rec = RawRecord::deserialize(raw)
        .map_err(|e| SkytrailError::InvalidRecord(format!("record {index}: {e}")))?;

    let (Some(lat), Some(lon)) = (as_number(rec.lat.as_ref()), as_number(rec.lon.as_ref())) else {
        return Err(SkytrailError::InvalidRecord(format!("record {index}: missing coordinates")));
    };
    if lat == 0.0 || lon == 0.0 {
        return Err(SkytrailError::InvalidRecord(format!("record {index}: zero coordinates")));
    }
    if !geofence.contains(lat, lon) {
        return Err(SkytrailError::InvalidRecord(format!(
            "record {index}: ({lat},{lon}) outside geofence"
        )));
    }

    let id = non_empty_string(rec.id()).unwrap_or_else(|| fallback_id(index));
    let mut ac = Aircraft::new(id, Position::new(lat, lon));

    ac.callsign = string_or(rec.callsign(), UNKNOWN_CALLSIGN);
    ac.velocity = normalize_velocity(rec.velocity());
    if let Some(heading) = as_number(rec.heading()) {
        ac.heading = heading;
        ac.heading_known = true;
    }
    ac.origin = string_or(rec.origin.as_ref(), UNKNOWN_AIRPORT);
    ac.destination = string_or(rec.destination.as_ref(), UNKNOWN_AIRPORT);

    // adsb feeds report "ground" in place of a barometric altitude
    let reported_ground =
        matches!(rec.altitude(), Some(Value::String(s)) if s.eq_ignore_ascii_case("ground"));
    ac.altitude = if reported_ground { Some(0.0) } else { as_number(rec.altitude()) };
    ac.on_ground = reported_ground || matches!(rec.on_ground, Some(Value::Bool(true)));

    Ok(ac)
}

/// Turn a raw snapshot into the next active set: invalid, out-of-region and duplicate-id records
/// are dropped, and the survivors are truncated to `max_tracked` in arrival order.
pub fn ingest(
    snapshot: RawSnapshot,
    geofence: &Geofence,
    max_tracked: usize,
) -> Result<Vec<Aircraft>> {
    let Some(records) = snapshot.into_records() else {
        return Err(SkytrailError::MalformedSnapshot("no aircraft collection".to_string()));
    };

    let total = records.len();
    let mut seen = HashSet::new();
    let mut active = Vec::with_capacity(total.min(max_tracked));
    let mut dropped = 0;

    for (index, raw) in records.iter().enumerate() {
        if active.len() == max_tracked {
            break;
        }
        match build_aircraft(index, raw, geofence) {
            Ok(ac) if seen.insert(ac.id.clone()) => active.push(ac),
            Ok(ac) => {
                debug!("dropping duplicate aircraft id {}", ac.id);
                dropped += 1;
            }
            Err(e) => {
                debug!("{}", e);
                dropped += 1;
            }
        }
    }

    info!(
        "ingested {} aircraft from {} records ({} dropped, limit {})",
        active.len(),
        total,
        dropped,
        max_tracked
    );
    Ok(active)
}
