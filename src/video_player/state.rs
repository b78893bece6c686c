// SPDX-License-Identifier: MPL-2.0
//! Playback state machine driven by player status reports.
//!
//! The state is never changed optimistically. Issuing Play does not make the
//! view show "playing"; the next status carrying a moving timeline does. A
//! dropped or delayed command therefore cannot leave the view out of step
//! with the player.
//!
//! - Paused -> Playing: status with a non-zero-rate timeline
//! - Playing -> Paused: status with a zero-rate timeline
//! - any -> Ended: status reporting end of stream
//! - Ended -> Playing: Restart command (seek to zero + play), then a status

use crate::domain::playback::{
    Metadata, PixelAspectRatio, PlaybackState, PlayerCommand, PlayerStatus, Problem,
    TimelineFunction, VideoSize,
};

/// What changed as a result of applying one status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusEffects {
    /// The derived playback state differs from the previous one.
    pub state_changed: bool,
    /// Video size or pixel aspect ratio changed; layout must be recomputed.
    pub video_size_changed: bool,
    /// A problem that was not being reported before.
    pub problem: Option<Problem>,
}

/// Playback state derived from the latest player status.
#[derive(Debug, Clone, Default)]
pub struct PlaybackStateMachine {
    timeline: TimelineFunction,
    state: PlaybackState,
    previous_state: PlaybackState,
    metadata: Option<Metadata>,
    metadata_shown: bool,
    problem_shown: bool,
    video_size: VideoSize,
    pixel_aspect_ratio: PixelAspectRatio,
}

impl PlaybackStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a status report.
    pub fn apply_status(&mut self, status: PlayerStatus) -> StatusEffects {
        let mut effects = StatusEffects::default();

        if let Some(transform) = status.timeline_transform {
            match TimelineFunction::try_from(transform) {
                Ok(timeline) => self.timeline = timeline,
                Err(err) => log::warn!("Ignoring timeline transform {transform:?}: {err}"),
            }
        }

        self.previous_state = self.state;
        self.state = if status.end_of_stream {
            PlaybackState::Ended
        } else if self.timeline.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };
        effects.state_changed = self.state != self.previous_state;

        // Edge-triggered: report a problem once, re-arm when it clears.
        match status.problem {
            Some(problem) => {
                if !self.problem_shown {
                    log::warn!("Playback problem: {problem}");
                    self.problem_shown = true;
                    effects.problem = Some(problem);
                }
            }
            None => self.problem_shown = false,
        }

        if let (Some(video_size), Some(pixel_aspect_ratio)) =
            (status.video_size, status.pixel_aspect_ratio)
        {
            if video_size != self.video_size || pixel_aspect_ratio != self.pixel_aspect_ratio {
                self.video_size = video_size;
                self.pixel_aspect_ratio = pixel_aspect_ratio;
                log::info!("video size {video_size}, pixel aspect ratio {pixel_aspect_ratio}");
                effects.video_size_changed = true;
            }
        }

        self.metadata = status.metadata;
        match &self.metadata {
            Some(metadata) if !self.metadata_shown => {
                log_metadata(metadata);
                self.metadata_shown = true;
            }
            Some(_) => {}
            None => self.metadata_shown = false,
        }

        effects
    }

    /// Command that toggles between playing and not playing.
    #[must_use]
    pub fn toggle_command(&self) -> PlayerCommand {
        match self.state {
            PlaybackState::Paused => PlayerCommand::Play,
            PlaybackState::Playing => PlayerCommand::Pause,
            PlaybackState::Ended => PlayerCommand::Restart,
        }
    }

    /// Fraction of the media played at reference time `now`, in `[0.0, 1.0]`.
    ///
    /// Returns 0.0 when there is no metadata or the duration is unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn progress_at(&self, now: i64) -> f32 {
        let Some(metadata) = &self.metadata else {
            return 0.0;
        };
        if metadata.duration == 0 {
            return 0.0;
        }

        let duration = i64::try_from(metadata.duration).unwrap_or(i64::MAX);
        let position = self.timeline.apply(now).clamp(0, duration);
        (position as f64 / duration as f64) as f32
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// State before the most recent status was applied.
    #[must_use]
    pub fn previous_state(&self) -> PlaybackState {
        self.previous_state
    }

    #[must_use]
    pub fn timeline(&self) -> &TimelineFunction {
        &self.timeline
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn video_size(&self) -> VideoSize {
        self.video_size
    }

    #[must_use]
    pub fn pixel_aspect_ratio(&self) -> PixelAspectRatio {
        self.pixel_aspect_ratio
    }

    /// Whether the current problem has already been reported.
    #[must_use]
    pub fn problem_shown(&self) -> bool {
        self.problem_shown
    }
}

fn log_metadata(metadata: &Metadata) {
    fn or_none(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or("<none>")
    }

    log::debug!("duration   {:.1} seconds", metadata.duration_secs());
    log::debug!("title      {}", or_none(&metadata.title));
    log::debug!("artist     {}", or_none(&metadata.artist));
    log::debug!("album      {}", or_none(&metadata.album));
    log::debug!("publisher  {}", or_none(&metadata.publisher));
    log::debug!("genre      {}", or_none(&metadata.genre));
    log::debug!("composer   {}", or_none(&metadata.composer));
}
