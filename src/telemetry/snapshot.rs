// src/telemetry/snapshot.rs

use super::parser::{estimate_eta, percent_of};

/// Progress telemetry.
///
/// Used both for the partial result of parsing a single line and for the
/// cumulative view the job controller keeps; every field is optional because
/// most lines only carry some of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressSnapshot {
    /// Output position in seconds.
    pub position: Option<f64>,
    /// Encode speed as a multiple of real time.
    pub speed: Option<f64>,
    /// 0–100.
    pub percent: Option<f64>,
    /// Estimated seconds remaining.
    pub eta: Option<f64>,
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    pub bitrate: Option<String>,
    pub size: Option<String>,
}

impl ProgressSnapshot {
    pub fn is_empty(&self) -> bool {
        *self == ProgressSnapshot::default()
    }

    /// Fold a per-line update into this cumulative snapshot.
    ///
    /// Present fields overwrite, absent fields keep their prior value. When
    /// the update has a position but no speed, the ETA is recomputed with the
    /// last speed seen on an earlier line.
    pub fn merge(&mut self, update: &ProgressSnapshot, total_duration: f64) {
        let prior_speed = self.speed;

        if update.speed.is_some() {
            self.speed = update.speed;
        }
        if update.position.is_some() {
            self.position = update.position;
        }
        if update.percent.is_some() {
            self.percent = update.percent;
        }
        if update.eta.is_some() {
            self.eta = update.eta;
        }
        if update.frame.is_some() {
            self.frame = update.frame;
        }
        if update.fps.is_some() {
            self.fps = update.fps;
        }
        if update.bitrate.is_some() {
            self.bitrate = update.bitrate.clone();
        }
        if update.size.is_some() {
            self.size = update.size.clone();
        }

        if let (Some(position), None, Some(speed)) = (update.position, update.speed, prior_speed) {
            self.eta = estimate_eta(position, total_duration, speed);
            self.percent = percent_of(position, total_duration).or(self.percent);
        }
    }

    /// Zero percent and ETA so a cancelled job does not show stale progress.
    pub fn reset_progress(&mut self) {
        self.percent = Some(0.0);
        self.eta = Some(0.0);
    }
}
