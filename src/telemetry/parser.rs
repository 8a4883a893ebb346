// src/telemetry/parser.rs

//! Pure parsing of encoder status lines.
//!
//! Handles both the classic status line
//! (`frame=  84 fps= 81 ... time=00:00:01.40 bitrate=... speed=1.35x`) and the
//! one-field-per-line `-progress` form (`out_time=00:00:01.400000`).

use std::sync::LazyLock;

use regex::Regex;

use super::snapshot::ProgressSnapshot;

/// Value the encoder prints for fields it cannot compute yet.
const NOT_AVAILABLE: &str = "N/A";

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<name>\w+)=\s*(?P<value>\S+)").expect("field regex is valid")
});

/// Parse one line of encoder output.
///
/// `total_duration` is the expected length of the output in seconds; values
/// `<= 0` (or non-finite) mean "unknown", in which case no percent or ETA is
/// derived. Lines without recognised fields yield an empty snapshot.
pub fn parse_line(line: &str, total_duration: f64) -> ProgressSnapshot {
    let mut update = ProgressSnapshot::default();

    for caps in FIELD_RE.captures_iter(line) {
        let name = &caps["name"];
        let value = &caps["value"];

        if value == NOT_AVAILABLE {
            continue;
        }

        match name {
            "speed" => update.speed = parse_speed(value).or(update.speed),
            "time" | "out_time" => update.position = parse_timestamp(value).or(update.position),
            "frame" => update.frame = value.parse().ok().or(update.frame),
            "fps" => update.fps = value.parse().ok().or(update.fps),
            "bitrate" => update.bitrate = Some(value.to_string()),
            "size" | "total_size" => update.size = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(position) = update.position {
        let speed = update.speed.unwrap_or(1.0);
        update.eta = estimate_eta(position, total_duration, speed);
        update.percent = percent_of(position, total_duration);
    }

    update
}

/// `"1.35x"` → `1.35`.
pub fn parse_speed(value: &str) -> Option<f64> {
    let mut chars = value.chars();
    chars.next_back()?;
    chars.as_str().trim().parse().ok()
}

/// `[-]HH:MM:SS[.fraction]` (or bare seconds) → seconds.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let parts: Vec<&str> = body.split(':').collect();
    let seconds = match parts.as_slice() {
        [h, m, s] => {
            let h: u64 = h.parse().ok()?;
            let m: u64 = m.parse().ok()?;
            let s: f64 = s.parse().ok()?;
            h.checked_mul(3600)?.checked_add(m.checked_mul(60)?)? as f64 + s
        }
        [m, s] => {
            let m: u64 = m.parse().ok()?;
            let s: f64 = s.parse().ok()?;
            m.checked_mul(60)? as f64 + s
        }
        [s] => s.parse().ok()?,
        _ => return None,
    };

    if !seconds.is_finite() {
        return None;
    }

    Some(if negative { -seconds } else { seconds })
}

/// Seconds left at `speed`, or `None` when the total is unknown.
pub fn estimate_eta(position: f64, total_duration: f64, speed: f64) -> Option<f64> {
    if !has_duration(total_duration) {
        return None;
    }
    let speed = if speed > 0.0 && speed.is_finite() { speed } else { 1.0 };
    let remaining = (total_duration - position).max(0.0);
    Some(remaining / speed)
}

/// Position as a percentage of the total, clamped to `[0, 100]`.
pub fn percent_of(position: f64, total_duration: f64) -> Option<f64> {
    if !has_duration(total_duration) {
        return None;
    }
    Some((position / total_duration * 100.0).clamp(0.0, 100.0))
}

fn has_duration(total_duration: f64) -> bool {
    total_duration.is_finite() && total_duration > 0.0
}
