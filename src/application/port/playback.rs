// SPDX-License-Identifier: MPL-2.0
//! Playback service port definition.
//!
//! This module defines the [`PlaybackService`] trait: the remote player that
//! owns decoding and rendering. The view only issues transport commands and
//! long-polls for status.
//!
//! # Design Notes
//!
//! - Commands are fire-and-forget. `Ok(())` means the command was queued, not
//!   that it took effect; effects are observed through the next status.
//! - [`get_status`](PlaybackService::get_status) is a long-poll: the service
//!   holds the request until it has a version newer than the one passed in.
//! - The returned future is not `Send`. Everything runs on one thread.
//! - Timeline reference times are nanoseconds of the system monotonic clock
//!   (`CLOCK_MONOTONIC` on Unix), the clock read by
//!   [`local_now`](crate::video_player::local_now). A service using another
//!   time base needs a matching [`Clock`](crate::video_player::Clock)
//!   injected into the view.

use crate::domain::playback::{PlayerCommand, StatusResponse, StatusVersion};
use futures_util::future::LocalBoxFuture;
use std::fmt;

/// Failure talking to the playback service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The connection to the service is gone.
    Disconnected,
    /// The transport reported an error.
    Transport(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Disconnected => write!(f, "playback service disconnected"),
            ServiceError::Transport(msg) => write!(f, "playback service transport error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Port for the remote playback engine.
///
/// # Example
///
/// ```ignore
/// use media_player_view::application::port::PlaybackService;
/// use media_player_view::domain::playback::StatusVersion;
///
/// async fn first_status(service: &impl PlaybackService) {
///     let response = service.get_status(StatusVersion::INITIAL).await.unwrap();
///     println!("now at {}", response.version);
/// }
/// ```
pub trait PlaybackService {
    /// Sets the media to play.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the command could not be queued.
    fn set_url(&self, url: &str) -> Result<(), ServiceError>;

    /// Starts or resumes playback.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the command could not be queued.
    fn play(&self) -> Result<(), ServiceError>;

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the command could not be queued.
    fn pause(&self) -> Result<(), ServiceError>;

    /// Seeks to a media position in nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the command could not be queued.
    fn seek(&self, position_ns: i64) -> Result<(), ServiceError>;

    /// Requests the status following `last_version`.
    ///
    /// The future resolves once the service has a newer version, or with an
    /// empty response when it wants the caller to simply ask again.
    fn get_status(
        &self,
        last_version: StatusVersion,
    ) -> LocalBoxFuture<'static, Result<StatusResponse, ServiceError>>;

    /// Sends a [`PlayerCommand`], expanding `Restart` into a seek to zero
    /// followed by play.
    ///
    /// # Errors
    ///
    /// Returns the first [`ServiceError`] encountered.
    fn submit(&self, command: &PlayerCommand) -> Result<(), ServiceError> {
        match command {
            PlayerCommand::SetUrl(url) => self.set_url(url),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Seek(position_ns) => self.seek(*position_ns),
            PlayerCommand::Restart => {
                self.seek(0)?;
                self.play()
            }
        }
    }
}
