use std::collections::VecDeque;

use serde::Serialize;

use crate::geo::Position;

pub const TRAIL_CAPACITY: usize = 10;
pub const UNKNOWN_CALLSIGN: &str = "Unknown";
pub const UNKNOWN_AIRPORT: &str = "—";

/// Bounded recent-position history, newest last. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trail(VecDeque<Position>);

impl Trail {
    pub fn new(initial: Position) -> Self {
        let mut positions = VecDeque::with_capacity(TRAIL_CAPACITY);
        positions.push_back(initial);
        Trail(positions)
    }

    pub fn push(&mut self, pos: Position) {
        if self.0.len() == TRAIL_CAPACITY {
            self.0.pop_front();
        }
        self.0.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Position> {
        self.0.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aircraft {
    pub id: String,
    pub callsign: String,
    pub position: Position,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>, // m/s
    pub heading: f64,          // degrees clockwise from north
    pub heading_known: bool,   // false when the feed sent no track and heading is the 0 default
    pub on_ground: bool,
    pub origin: String,
    pub destination: String,
    pub trail: Trail,
}

impl Aircraft {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Aircraft {
            id: id.into(),
            callsign: UNKNOWN_CALLSIGN.to_string(),
            position,
            altitude: None,
            velocity: None,
            heading: 0.0,
            heading_known: false,
            on_ground: false,
            origin: UNKNOWN_AIRPORT.to_string(),
            destination: UNKNOWN_AIRPORT.to_string(),
            trail: Trail::new(position),
        }
    }

    /// null, NaN and non-positive velocities all count as standing still
    pub fn is_moving(&self) -> bool {
        self.velocity.is_some_and(|v| v > 0.0)
    }

    pub fn move_to(&mut self, pos: Position) {
        self.position = pos;
        self.trail.push(pos);
    }
}
