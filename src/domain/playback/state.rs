// SPDX-License-Identifier: MPL-2.0
//! Discrete playback states.

/// Playback state derived from the most recent player status.
///
/// This value is never set directly by user commands; it only follows what
/// the playback service confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Timeline rate is zero.
    #[default]
    Paused,
    /// Timeline rate is non-zero.
    Playing,
    /// The service reported end of stream.
    Ended,
}

impl PlaybackState {
    /// Returns true if the media is advancing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if playback reached the end of the stream.
    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// A transport command sent to the playback service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    SetUrl(String),
    Play,
    Pause,
    /// Seek to a position in nanoseconds.
    Seek(i64),
    /// Seek to zero and play, issued back to back.
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_paused() {
        assert_eq!(PlaybackState::default(), PlaybackState::Paused);
    }

    #[test]
    fn state_checks() {
        assert!(PlaybackState::Playing.is_playing());
        assert!(!PlaybackState::Paused.is_playing());
        assert!(!PlaybackState::Ended.is_playing());

        assert!(PlaybackState::Ended.is_ended());
        assert!(!PlaybackState::Playing.is_ended());
    }
}
