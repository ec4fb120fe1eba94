use serde_json::Value;

pub const KNOTS_TO_MPS: f64 = 0.514444;

// values above this are implausible as knots and are taken to be m/s already
const UPPER_THRESHOLD: f64 = 1000.0;
// values above this (and not above UPPER_THRESHOLD) are taken to be knots
const KNOTS_THRESHOLD: f64 = 100.0;

/// Coerce an untrusted JSON value into a finite number. Accepts numbers and numeric strings.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Normalize a raw velocity of unknown unit into meters per second.
///
/// Providers mix knots and m/s without tagging the unit, so this uses the two-threshold
/// heuristic: anything above 1000 is already m/s, anything above 100 is knots, the rest is m/s.
pub fn normalize_velocity(raw: Option<&Value>) -> Option<f64> {
    let n = as_number(raw)?;

    if n > UPPER_THRESHOLD {
        Some(n)
    } else if n > KNOTS_THRESHOLD {
        Some(n * KNOTS_TO_MPS)
    } else {
        Some(n)
    }
}
