// SPDX-License-Identifier: MPL-2.0
//! Linear time mapping between reference (clock) time and subject (media) time.
//!
//! A [`TimelineFunction`] is what the playback service reports instead of a
//! stream of position updates: given the point where the media timeline was
//! anchored and the playback rate, any later clock reading can be turned into
//! a media position without asking the service again.

use std::fmt;

/// Errors raised when constructing a [`TimelineFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineError {
    /// The reference delta is zero, so the mapping has no defined rate.
    ZeroReferenceDelta,
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::ZeroReferenceDelta => {
                write!(f, "timeline reference delta must be non-zero")
            }
        }
    }
}

impl std::error::Error for TimelineError {}

/// Wire form of a timeline as carried in a player status.
///
/// Unlike [`TimelineFunction`], this type does not enforce any invariant; it
/// is validated on conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineTransform {
    pub reference_time: i64,
    pub subject_time: i64,
    pub reference_delta: i64,
    pub subject_delta: i64,
}

/// Piecewise-linear mapping from reference time to subject time.
///
/// `apply(t) = subject_time0 + (t - reference_time0) * subject_delta / reference_delta`
///
/// The result is not clamped: values before the start of the media or past
/// its end are legitimate while a seek settles. Clamping is a presentation
/// concern handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineFunction {
    reference_time0: i64,
    subject_time0: i64,
    subject_delta: i64,
    reference_delta: i64,
}

impl TimelineFunction {
    /// Creates a timeline function.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::ZeroReferenceDelta`] if `reference_delta` is zero.
    pub fn new(
        reference_time0: i64,
        subject_time0: i64,
        subject_delta: i64,
        reference_delta: i64,
    ) -> Result<Self, TimelineError> {
        if reference_delta == 0 {
            return Err(TimelineError::ZeroReferenceDelta);
        }
        Ok(Self {
            reference_time0,
            subject_time0,
            subject_delta,
            reference_delta,
        })
    }

    /// Maps a reference timestamp to a subject timestamp.
    ///
    /// Uses a 128-bit intermediate so that large clock values multiplied by
    /// the rate numerator cannot overflow; the result saturates at the `i64`
    /// bounds.
    #[must_use]
    pub fn apply(&self, reference_time: i64) -> i64 {
        let elapsed = i128::from(reference_time) - i128::from(self.reference_time0);
        let scaled = elapsed * i128::from(self.subject_delta) / i128::from(self.reference_delta);
        let subject = i128::from(self.subject_time0) + scaled;
        subject.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    #[must_use]
    pub fn reference_time0(&self) -> i64 {
        self.reference_time0
    }

    #[must_use]
    pub fn subject_time0(&self) -> i64 {
        self.subject_time0
    }

    #[must_use]
    pub fn subject_delta(&self) -> i64 {
        self.subject_delta
    }

    #[must_use]
    pub fn reference_delta(&self) -> i64 {
        self.reference_delta
    }

    /// Returns the playback rate (subject units per reference unit).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self) -> f64 {
        self.subject_delta as f64 / self.reference_delta as f64
    }

    /// Returns true if the subject timeline does not advance.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.subject_delta == 0
    }
}

impl Default for TimelineFunction {
    /// Paused at media time zero.
    fn default() -> Self {
        Self {
            reference_time0: 0,
            subject_time0: 0,
            subject_delta: 0,
            reference_delta: 1,
        }
    }
}

impl TryFrom<TimelineTransform> for TimelineFunction {
    type Error = TimelineError;

    fn try_from(transform: TimelineTransform) -> Result<Self, Self::Error> {
        Self::new(
            transform.reference_time,
            transform.subject_time,
            transform.subject_delta,
            transform.reference_delta,
        )
    }
}
