// SPDX-License-Identifier: MPL-2.0
//! Reference clock used to evaluate timeline functions.
//!
//! Timeline functions reported by the playback service are anchored in the
//! system monotonic clock, in nanoseconds. [`local_now`] reads that same
//! clock so positions can be extrapolated between status updates, even when
//! the service runs in another process.

use std::cell::Cell;
#[cfg(unix)]
use std::mem::MaybeUninit;

#[cfg(unix)]
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Returns the system monotonic clock (`CLOCK_MONOTONIC`) in nanoseconds.
#[cfg(unix)]
#[must_use]
pub fn local_now() -> i64 {
    let mut now = MaybeUninit::<libc::timespec>::uninit();
    // SAFETY: `now` points to writable memory large enough for a timespec.
    if unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, now.as_mut_ptr()) } != 0 {
        return process_now();
    }
    // SAFETY: a zero return means the kernel filled the timespec.
    timespec_to_nanos(unsafe { &now.assume_init() })
}

/// Returns monotonic nanoseconds since the process first read the clock.
#[cfg(not(unix))]
#[must_use]
pub fn local_now() -> i64 {
    process_now()
}

#[cfg(unix)]
#[allow(clippy::useless_conversion)] // field widths vary by target
fn timespec_to_nanos(time: &libc::timespec) -> i64 {
    i64::from(time.tv_sec)
        .saturating_mul(NANOS_PER_SECOND)
        .saturating_add(i64::from(time.tv_nsec))
}

#[allow(clippy::cast_possible_truncation)] // i64 nanoseconds cover ~292 years
fn process_now() -> i64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static REFERENCE_INSTANT: OnceLock<Instant> = OnceLock::new();
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    reference.elapsed().as_nanos() as i64
}

/// Source of reference time in nanoseconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Clock backed by [`local_now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> i64 {
        local_now()
    }
}

/// Clock that only moves when told to. Useful for hosts that replay
/// recorded sessions and for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    pub fn advance(&self, delta_ns: i64) {
        self.now.set(self.now.get().saturating_add(delta_ns));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.get()
    }
}
