// SPDX-License-Identifier: MPL-2.0
//! Presentation frame-rate meter.
//!
//! Tracks the time between the last two presented frames and tells the caller
//! when a logging period boundary was crossed.

use std::time::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    frame_time: i64,
    prev_frame_time: i64,
    log_interval_ns: i64,
}

impl FrameRateMeter {
    /// Creates a meter whose first frame interval starts at `now`.
    ///
    /// A zero `log_interval` disables periodic reporting.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(now: i64, log_interval: Duration) -> Self {
        Self {
            frame_time: now,
            prev_frame_time: now,
            log_interval_ns: log_interval.as_nanos().min(i64::MAX as u128) as i64,
        }
    }

    /// Records a presented frame at `now`.
    ///
    /// Returns true if this frame falls in a different logging period than
    /// the previous one.
    pub fn record_frame(&mut self, now: i64) -> bool {
        self.prev_frame_time = self.frame_time;
        self.frame_time = now;

        if self.log_interval_ns == 0 {
            return false;
        }
        self.frame_time.div_euclid(self.log_interval_ns)
            != self.prev_frame_time.div_euclid(self.log_interval_ns)
    }

    /// Frames per second derived from the last frame interval, or 0.0 if the
    /// last two frames share a timestamp.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_rate(&self) -> f32 {
        let interval = self.frame_time - self.prev_frame_time;
        if interval <= 0 {
            return 0.0;
        }
        (NANOS_PER_SEC as f64 / interval as f64) as f32
    }
}
