// src/telemetry/format.rs

/// Render seconds as `HH:MM:SS`, flooring fractional seconds.
///
/// Negative or non-finite input renders as `00:00:00`.
pub fn format_seconds(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}
