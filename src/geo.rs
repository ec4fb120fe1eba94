use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position { lat, lon }
    }
}

/// Closed lat/lon rectangle used to admit aircraft into the active set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Geofence {
            lat_min: 6.0,
            lat_max: 38.0,
            lon_min: 68.0,
            lon_max: 97.0,
        }
    }
}

impl Geofence {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        // NaN fails every comparison so non-finite input falls out here
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }

    pub fn contains_position(&self, pos: &Position) -> bool {
        self.contains(pos.lat, pos.lon)
    }

    pub fn is_valid(&self) -> bool {
        [self.lat_min, self.lat_max, self.lon_min, self.lon_max]
            .iter()
            .all(|v| v.is_finite())
            && self.lat_min <= self.lat_max
            && self.lon_min <= self.lon_max
    }
}

/// Dead-reckon a position forward by `dt` seconds at `speed` m/s along `heading` degrees.
///
/// Flat-earth short step, only meaningful for sub-kilometer distances. Any missing or
/// non-finite input leaves the position where it is.
pub fn project(
    pos: Option<Position>,
    heading: Option<f64>,
    speed: Option<f64>,
    dt: f64,
) -> Option<Position> {
    let pos = pos?;
    let (Some(heading), Some(speed)) = (heading, speed) else {
        return Some(pos);
    };
    if speed == 0.0 || ![pos.lat, pos.lon, heading, speed, dt].iter().all(|v| v.is_finite()) {
        return Some(pos);
    }

    let distance = speed * dt;
    let heading_rad = heading.to_radians();
    let d_lat = distance * heading_rad.cos() / EARTH_RADIUS_M;
    let d_lon = distance * heading_rad.sin() / (EARTH_RADIUS_M * pos.lat.to_radians().cos());

    Some(Position {
        lat: pos.lat + d_lat.to_degrees(),
        lon: pos.lon + d_lon.to_degrees(),
    })
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: &Position, b: &Position) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b` in degrees [0, 360).
pub fn bearing(a: &Position, b: &Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    (x.atan2(y).to_degrees() + 360.0) % 360.0
}
