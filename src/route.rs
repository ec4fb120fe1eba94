use serde::Serialize;

use crate::aircraft::Aircraft;
use crate::geo::{Position, bearing, haversine_km};

pub struct Airport {
    pub code: &'static str,
    pub name: &'static str,
    pub position: Position,
}

const fn airport(code: &'static str, name: &'static str, lat: f64, lon: f64) -> Airport {
    Airport { code, name, position: Position { lat, lon } }
}

pub static AIRPORTS: [Airport; 8] = [
    airport("VABB", "Mumbai", 19.0896, 72.8656),
    airport("VIDP", "Delhi", 28.5562, 77.1000),
    airport("VOBL", "Bengaluru", 13.1986, 77.7066),
    airport("VOMM", "Chennai", 12.9941, 80.1709),
    airport("VOHS", "Hyderabad", 17.2403, 78.4294),
    airport("VECC", "Kolkata", 22.6547, 88.4467),
    airport("VAAH", "Ahmedabad", 23.0772, 72.6347),
    airport("VAPO", "Pune", 18.5793, 73.9089),
];

// an aircraft this low and this close to an airport probably departed from it
const DEPARTURE_MAX_ALTITUDE: f64 = 3000.0;
const DEPARTURE_MAX_DISTANCE_KM: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Confirmed,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub code: &'static str,
    pub name: &'static str,
    pub position: Position,
}

impl From<&Airport> for Endpoint {
    fn from(a: &Airport) -> Self {
        Endpoint { code: a.code, name: a.name, position: a.position }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub kind: RouteKind,
    pub origin: Option<Endpoint>,
    pub destination: Option<Endpoint>,
}

pub fn lookup(code: &str) -> Option<&'static Airport> {
    AIRPORTS.iter().find(|a| a.code == code)
}

fn nearest_airport(pos: &Position) -> Option<(&'static Airport, f64)> {
    AIRPORTS
        .iter()
        .map(|a| (a, haversine_km(pos, &a.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Airport whose bearing from `pos` is closest to `heading` (plain absolute difference).
fn airport_ahead(pos: &Position, heading: f64) -> Option<&'static Airport> {
    AIRPORTS
        .iter()
        .map(|a| (a, (bearing(pos, &a.position) - heading).abs()))
        .filter(|(_, diff)| diff.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(a, _)| a)
}

pub fn estimate(ac: &Aircraft) -> Option<RouteOverlay> {
    let origin = match (ac.altitude, nearest_airport(&ac.position)) {
        (Some(alt), Some((airport, dist)))
            if alt < DEPARTURE_MAX_ALTITUDE && dist < DEPARTURE_MAX_DISTANCE_KM =>
        {
            Some(Endpoint::from(airport))
        }
        _ => None,
    };
    // a defaulted heading of 0 says nothing about where the aircraft is going
    let destination = if ac.heading_known {
        airport_ahead(&ac.position, ac.heading).map(Endpoint::from)
    } else {
        None
    };

    if origin.is_none() && destination.is_none() {
        return None;
    }
    Some(RouteOverlay { kind: RouteKind::Estimated, origin, destination })
}

/// Route line for the focused aircraft: the reported endpoints when both are known airports,
/// an estimate from position and heading otherwise.
pub fn overlay(ac: &Aircraft) -> Option<RouteOverlay> {
    match (lookup(&ac.origin), lookup(&ac.destination)) {
        (Some(origin), Some(destination)) => Some(RouteOverlay {
            kind: RouteKind::Confirmed,
            origin: Some(origin.into()),
            destination: Some(destination.into()),
        }),
        _ => estimate(ac),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_route() {
        let mut ac = Aircraft::new("a", Position::new(22.0, 75.0));
        ac.origin = "VABB".to_string();
        ac.destination = "VIDP".to_string();

        let route = overlay(&ac).unwrap();
        assert_eq!(route.kind, RouteKind::Confirmed);
        assert_eq!(route.origin.unwrap().name, "Mumbai");
        assert_eq!(route.destination.unwrap().position, Position::new(28.5562, 77.1000));
    }

    #[test]
    fn test_estimated_route_after_departure() {
        // just north of Mumbai, climbing out towards Delhi
        let mut ac = Aircraft::new("a", Position::new(19.2, 72.9));
        ac.altitude = Some(2000.0);
        ac.heading = 22.0;
        ac.heading_known = true;

        let route = overlay(&ac).unwrap();
        assert_eq!(route.kind, RouteKind::Estimated);
        assert_eq!(route.origin.unwrap().code, "VABB");
        assert_eq!(route.destination.unwrap().code, "VIDP");
    }

    #[test]
    fn test_cruising_aircraft_has_no_origin() {
        let mut ac = Aircraft::new("a", Position::new(22.0, 80.0));
        ac.altitude = Some(35000.0);
        ac.heading = 90.0;
        ac.heading_known = true;

        let route = overlay(&ac).unwrap();
        assert!(route.origin.is_none());
        assert_eq!(route.destination.unwrap().code, "VECC");
    }

    #[test]
    fn test_unknown_heading_has_no_destination() {
        let mut ac = Aircraft::new("a", Position::new(19.2, 72.9));
        ac.altitude = Some(2000.0);

        let route = overlay(&ac).unwrap();
        assert_eq!(route.origin.unwrap().code, "VABB");
        assert!(route.destination.is_none());

        ac.altitude = Some(35000.0);
        assert!(overlay(&ac).is_none());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("VOMM").map(|a| a.name), Some("Chennai"));
        assert!(lookup(crate::aircraft::UNKNOWN_AIRPORT).is_none());
    }
}
