// SPDX-License-Identifier: MPL-2.0
//! In-process playback service.
//!
//! [`loopback`] returns a connected pair: a [`LoopbackPlaybackService`] to
//! hand to the view and a [`LoopbackController`] playing the role of the
//! remote player. Status travels through a tokio `watch` channel, which gives
//! long-poll semantics for free: a request waits until the published
//! version moves past the one it carries. Commands travel through an
//! unbounded `mpsc` channel.
//!
//! The controller can also act as a minimal player with
//! [`LoopbackController::apply_pending_commands`], turning transport
//! commands into timeline updates.

use crate::application::port::{PlaybackService, ServiceError};
use crate::domain::playback::{
    PlayerCommand, PlayerStatus, StatusResponse, StatusVersion, TimelineFunction,
    TimelineTransform,
};
use futures_util::future::LocalBoxFuture;
use tokio::sync::{mpsc, watch};

type Published = (StatusVersion, PlayerStatus);

/// Creates a connected service/controller pair.
///
/// The controller starts with a default status already published at
/// version 1, so the first status request completes immediately.
#[must_use]
pub fn loopback() -> (LoopbackPlaybackService, LoopbackController) {
    let (status_tx, status_rx) = watch::channel((StatusVersion::new(1), PlayerStatus::default()));
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    (
        LoopbackPlaybackService {
            status: status_rx,
            commands: command_tx,
        },
        LoopbackController {
            status: status_tx,
            commands: command_rx,
            url: None,
        },
    )
}

/// View side of the loopback pair.
#[derive(Debug, Clone)]
pub struct LoopbackPlaybackService {
    status: watch::Receiver<Published>,
    commands: mpsc::UnboundedSender<PlayerCommand>,
}

impl LoopbackPlaybackService {
    fn send(&self, command: PlayerCommand) -> Result<(), ServiceError> {
        self.commands
            .send(command)
            .map_err(|_| ServiceError::Disconnected)
    }
}

impl PlaybackService for LoopbackPlaybackService {
    fn set_url(&self, url: &str) -> Result<(), ServiceError> {
        self.send(PlayerCommand::SetUrl(url.to_string()))
    }

    fn play(&self) -> Result<(), ServiceError> {
        self.send(PlayerCommand::Play)
    }

    fn pause(&self) -> Result<(), ServiceError> {
        self.send(PlayerCommand::Pause)
    }

    fn seek(&self, position_ns: i64) -> Result<(), ServiceError> {
        self.send(PlayerCommand::Seek(position_ns))
    }

    fn get_status(
        &self,
        last_version: StatusVersion,
    ) -> LocalBoxFuture<'static, Result<StatusResponse, ServiceError>> {
        let mut receiver = self.status.clone();
        Box::pin(async move {
            loop {
                {
                    let current = receiver.borrow_and_update();
                    if current.0 > last_version {
                        return Ok(StatusResponse {
                            version: current.0,
                            status: Some(current.1.clone()),
                        });
                    }
                }
                receiver
                    .changed()
                    .await
                    .map_err(|_| ServiceError::Disconnected)?;
            }
        })
    }
}

/// Player side of the loopback pair. Dropping it disconnects the service.
#[derive(Debug)]
pub struct LoopbackController {
    status: watch::Sender<Published>,
    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    url: Option<String>,
}

impl LoopbackController {
    /// Publishes `status` under the next version and wakes pending requests.
    pub fn publish(&self, status: PlayerStatus) -> StatusVersion {
        let mut published = StatusVersion::INITIAL;
        self.status.send_modify(|(version, current)| {
            *version = StatusVersion::new(version.value() + 1);
            *current = status;
            published = *version;
        });
        published
    }

    /// Version of the most recently published status.
    #[must_use]
    pub fn version(&self) -> StatusVersion {
        self.status.borrow().0
    }

    /// Copy of the most recently published status.
    #[must_use]
    pub fn status(&self) -> PlayerStatus {
        self.status.borrow().1.clone()
    }

    /// URL from the last `SetUrl` handled by
    /// [`apply_pending_commands`](Self::apply_pending_commands).
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Next queued command, if any, without waiting.
    pub fn try_next_command(&mut self) -> Option<PlayerCommand> {
        self.commands.try_recv().ok()
    }

    /// Waits for the next command. Returns `None` once every service handle
    /// is gone and the queue is empty.
    pub async fn next_command(&mut self) -> Option<PlayerCommand> {
        self.commands.recv().await
    }

    /// Takes every queued command.
    pub fn drain_commands(&mut self) -> Vec<PlayerCommand> {
        std::iter::from_fn(|| self.try_next_command()).collect()
    }

    /// Plays the queued commands against the current status at reference
    /// time `now` and publishes the result once.
    ///
    /// Returns the number of commands applied.
    pub fn apply_pending_commands(&mut self, now: i64) -> usize {
        let commands = self.drain_commands();
        if commands.is_empty() {
            return 0;
        }

        let mut status = self.status();
        for command in &commands {
            self.apply(&mut status, command, now);
        }
        self.publish(status);
        commands.len()
    }

    fn apply(&mut self, status: &mut PlayerStatus, command: &PlayerCommand, now: i64) {
        let current = status
            .timeline_transform
            .and_then(|transform| TimelineFunction::try_from(transform).ok())
            .unwrap_or_default();
        let position = current.apply(now);

        let anchored = |subject_time: i64, subject_delta: i64| TimelineTransform {
            reference_time: now,
            subject_time,
            reference_delta: 1,
            subject_delta,
        };

        match command {
            PlayerCommand::SetUrl(url) => {
                log::info!("Loopback player loading {url}");
                self.url = Some(url.clone());
                *status = PlayerStatus {
                    timeline_transform: Some(anchored(0, 0)),
                    ..PlayerStatus::default()
                };
            }
            PlayerCommand::Play => {
                status.timeline_transform = Some(anchored(position, 1));
                status.end_of_stream = false;
            }
            PlayerCommand::Pause => {
                status.timeline_transform = Some(anchored(position, 0));
            }
            PlayerCommand::Seek(target) => {
                status.timeline_transform = Some(anchored(*target, current.subject_delta()));
                status.end_of_stream = false;
            }
            PlayerCommand::Restart => {
                status.timeline_transform = Some(anchored(0, 1));
                status.end_of_stream = false;
            }
        }
    }
}
