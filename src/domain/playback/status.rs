// SPDX-License-Identifier: MPL-2.0
//! Player status snapshot as reported by the playback service.

use super::timeline::TimelineTransform;
use std::fmt;

/// Fallback video width used for layout before any frame size is known.
pub const DEFAULT_VIDEO_WIDTH: u32 = 640;

/// Fallback video height used for layout before any frame size is known.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 100;

/// Opaque token identifying a status revision.
///
/// Only the playback service advances it; this crate just echoes the last
/// value it saw back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StatusVersion(u64);

impl StatusVersion {
    /// The version sent with the very first request.
    pub const INITIAL: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StatusVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Decoded video frame size in pixels.
///
/// A zero dimension means "not known yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the size to lay out with, substituting the fallback size for
    /// unknown dimensions.
    #[must_use]
    pub fn or_default_dimensions(self) -> Self {
        Self {
            width: if self.width == 0 {
                DEFAULT_VIDEO_WIDTH
            } else {
                self.width
            },
            height: if self.height == 0 {
                DEFAULT_VIDEO_HEIGHT
            } else {
                self.height
            },
        }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Shape of a single video pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelAspectRatio {
    pub width: u32,
    pub height: u32,
}

impl PixelAspectRatio {
    /// Square pixels.
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PixelAspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl fmt::Display for PixelAspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Descriptive information about the current media.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Total duration in nanoseconds. Zero if unknown.
    pub duration: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub composer: Option<String>,
}

impl Metadata {
    /// Creates metadata carrying only a duration.
    #[must_use]
    pub fn with_duration(duration: u64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// Duration in seconds, for display and logging.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.duration as f64 / 1_000_000_000.0
    }
}

/// A non-fatal playback fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Machine-readable fault category, e.g. `"unsupported_codec"`.
    pub kind: String,
    /// Optional human-readable detail.
    pub details: Option<String>,
}

impl Problem {
    #[must_use]
    pub fn new(kind: impl Into<String>, details: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            details,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}, {}", self.kind, details),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// One status report from the playback service.
///
/// Every optional field may be absent in any given report; absence of
/// `timeline_transform`, `video_size` or `pixel_aspect_ratio` means "unchanged",
/// while absence of `metadata` or `problem` means "none".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerStatus {
    pub timeline_transform: Option<TimelineTransform>,
    pub end_of_stream: bool,
    pub problem: Option<Problem>,
    pub video_size: Option<VideoSize>,
    pub pixel_aspect_ratio: Option<PixelAspectRatio>,
    pub metadata: Option<Metadata>,
}

/// Reply to a status long-poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    /// Version to send with the next request.
    pub version: StatusVersion,
    /// New status, or `None` if the service had nothing to report.
    pub status: Option<PlayerStatus>,
}
