// SPDX-License-Identifier: MPL-2.0
//! Status synchronization with the playback service.
//!
//! The service does not push updates. Instead the view keeps exactly one
//! long-poll request outstanding: it sends the last version it saw, the
//! service answers once something newer exists, and the answer immediately
//! triggers the next request.
//!
//! # Architecture
//!
//! ```text
//!            get_status(v)                 on_status(v', status)
//! ┌────────┐ ───────────▶ ┌─────────────┐ ─────────────────────▶ ┌────────────┐
//! │ cursor │              │   service   │                        │ StatusSink │
//! └────────┘ ◀─────────── └─────────────┘                        └────────────┘
//!               (v', status)        ▲                                  │
//!                                   └──────── get_status(v') ──────────┘
//! ```
//!
//! The loop holds the sink through a [`Weak`] reference only. When the owning
//! view is dropped, a response that still arrives finds nothing to upgrade and
//! the loop ends without touching freed state.

use crate::application::port::{PlaybackService, ServiceError};
use crate::domain::playback::{PlayerStatus, StatusResponse, StatusVersion};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tokio::task::JoinHandle;

/// Violations of the one-request-at-a-time long-poll protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// A request was started while another one was awaiting its response.
    RequestInFlight,
    /// The service returned a status without advancing the version.
    StaleVersion {
        last: StatusVersion,
        received: StatusVersion,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::RequestInFlight => write!(f, "a status request is already in flight"),
            SyncError::StaleVersion { last, received } => write!(
                f,
                "service returned a status at {received} after {last} was already seen"
            ),
        }
    }
}

impl std::error::Error for SyncError {}

/// Receives status updates from the loop.
pub trait StatusSink {
    /// Called once per response, in order. `status` is `None` when the
    /// service answered without new data.
    fn on_status(&mut self, version: StatusVersion, status: Option<PlayerStatus>);
}

/// Tracks the long-poll position and guards against concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct StatusCursor {
    version: StatusVersion,
    awaiting_response: bool,
}

impl StatusCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last version received from the service.
    #[must_use]
    pub fn version(&self) -> StatusVersion {
        self.version
    }

    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Marks a request as outstanding and returns the version to send.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RequestInFlight`] if a request is already outstanding.
    pub fn begin_request(&mut self) -> Result<StatusVersion, SyncError> {
        if self.awaiting_response {
            return Err(SyncError::RequestInFlight);
        }
        self.awaiting_response = true;
        Ok(self.version)
    }

    /// Records a response.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::StaleVersion`] if the response carries a status
    /// without a version newer than the last one seen. The cursor is left
    /// idle and unchanged in that case.
    pub fn complete(&mut self, response: &StatusResponse) -> Result<(), SyncError> {
        self.awaiting_response = false;
        if response.status.is_some() && response.version <= self.version {
            return Err(SyncError::StaleVersion {
                last: self.version,
                received: response.version,
            });
        }
        self.version = self.version.max(response.version);
        Ok(())
    }

    /// Clears the outstanding request after a transport failure.
    pub fn abort(&mut self) {
        self.awaiting_response = false;
    }
}

/// Why a status loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// The sink was dropped.
    OwnerDropped,
    /// The service failed; no further updates will arrive.
    ServiceFailed(ServiceError),
    /// The service broke the long-poll contract.
    ContractViolation(SyncError),
}

/// Runs the long-poll loop until the sink goes away or the service fails.
///
/// No `RefCell` borrow of the sink is held across an await point.
pub async fn run_status_loop<S, T>(service: Rc<S>, sink: Weak<RefCell<T>>) -> LoopExit
where
    S: PlaybackService + ?Sized,
    T: StatusSink + ?Sized,
{
    let mut cursor = StatusCursor::new();

    loop {
        if sink.strong_count() == 0 {
            return LoopExit::OwnerDropped;
        }

        let version = match cursor.begin_request() {
            Ok(version) => version,
            Err(err) => return LoopExit::ContractViolation(err),
        };

        let response = service.get_status(version).await;

        let Some(owner) = sink.upgrade() else {
            return LoopExit::OwnerDropped;
        };

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                cursor.abort();
                return LoopExit::ServiceFailed(err);
            }
        };

        if let Err(err) = cursor.complete(&response) {
            return LoopExit::ContractViolation(err);
        }

        owner.borrow_mut().on_status(response.version, response.status);
    }
}

/// Handle to a spawned status loop. Dropping it cancels the loop.
#[derive(Debug)]
pub struct StatusLoopHandle {
    task: Option<JoinHandle<LoopExit>>,
}

impl StatusLoopHandle {
    /// Returns true once the loop has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancels the loop. Any in-flight response is discarded.
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Waits for the loop to stop. Returns `None` if it was cancelled.
    pub async fn finished(mut self) -> Option<LoopExit> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for StatusLoopHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Spawns [`run_status_loop`] on the current thread's local task set.
///
/// # Panics
///
/// Panics if called outside a [`tokio::task::LocalSet`].
pub fn spawn_status_loop<S, T>(service: Rc<S>, sink: Weak<RefCell<T>>) -> StatusLoopHandle
where
    S: PlaybackService + ?Sized + 'static,
    T: StatusSink + ?Sized + 'static,
{
    let task = tokio::task::spawn_local(async move {
        let exit = run_status_loop(service, sink).await;
        match &exit {
            LoopExit::OwnerDropped => log::debug!("Status loop stopped: view dropped"),
            LoopExit::ServiceFailed(err) => log::error!("Status updates stopped: {err}"),
            LoopExit::ContractViolation(err) => log::error!("Status updates stopped: {err}"),
        }
        exit
    });

    StatusLoopHandle { task: Some(task) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::LocalBoxFuture;
    use std::collections::VecDeque;

    /// Service that replays scripted responses and records requested versions.
    #[derive(Default)]
    struct ScriptedService {
        responses: RefCell<VecDeque<Result<StatusResponse, ServiceError>>>,
        requested: RefCell<Vec<StatusVersion>>,
    }

    impl ScriptedService {
        fn with(responses: Vec<Result<StatusResponse, ServiceError>>) -> Rc<Self> {
            Rc::new(Self {
                responses: RefCell::new(responses.into()),
                requested: RefCell::default(),
            })
        }
    }

    impl PlaybackService for ScriptedService {
        fn set_url(&self, _url: &str) -> Result<(), ServiceError> {
            Ok(())
        }

        fn play(&self) -> Result<(), ServiceError> {
            Ok(())
        }

        fn pause(&self) -> Result<(), ServiceError> {
            Ok(())
        }

        fn seek(&self, _position_ns: i64) -> Result<(), ServiceError> {
            Ok(())
        }

        fn get_status(
            &self,
            last_version: StatusVersion,
        ) -> LocalBoxFuture<'static, Result<StatusResponse, ServiceError>> {
            self.requested.borrow_mut().push(last_version);
            let next = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ServiceError::Disconnected));
            Box::pin(async move { next })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<(StatusVersion, bool)>,
    }

    impl StatusSink for RecordingSink {
        fn on_status(&mut self, version: StatusVersion, status: Option<PlayerStatus>) {
            self.seen.push((version, status.is_some()));
        }
    }

    fn response(version: u64, with_status: bool) -> Result<StatusResponse, ServiceError> {
        Ok(StatusResponse {
            version: StatusVersion::new(version),
            status: with_status.then(PlayerStatus::default),
        })
    }

    #[test]
    fn cursor_rejects_second_request() {
        let mut cursor = StatusCursor::new();
        assert_eq!(cursor.begin_request(), Ok(StatusVersion::INITIAL));
        assert!(cursor.is_awaiting_response());
        assert_eq!(cursor.begin_request(), Err(SyncError::RequestInFlight));
    }

    #[test]
    fn cursor_advances_to_response_version() {
        let mut cursor = StatusCursor::new();
        cursor.begin_request().unwrap();
        cursor
            .complete(&StatusResponse {
                version: StatusVersion::new(3),
                status: Some(PlayerStatus::default()),
            })
            .unwrap();
        assert_eq!(cursor.version(), StatusVersion::new(3));
        assert_eq!(cursor.begin_request(), Ok(StatusVersion::new(3)));
    }

    #[test]
    fn cursor_rejects_stale_payload() {
        let mut cursor = StatusCursor::new();
        cursor.begin_request().unwrap();
        cursor
            .complete(&StatusResponse {
                version: StatusVersion::new(2),
                status: Some(PlayerStatus::default()),
            })
            .unwrap();
        cursor.begin_request().unwrap();
        let err = cursor
            .complete(&StatusResponse {
                version: StatusVersion::new(2),
                status: Some(PlayerStatus::default()),
            })
            .unwrap_err();
        assert_eq!(
            err,
            SyncError::StaleVersion {
                last: StatusVersion::new(2),
                received: StatusVersion::new(2)
            }
        );
        assert!(!cursor.is_awaiting_response());
    }

    #[test]
    fn cursor_accepts_empty_response_at_same_version() {
        let mut cursor = StatusCursor::new();
        cursor.begin_request().unwrap();
        assert!(cursor
            .complete(&StatusResponse {
                version: StatusVersion::INITIAL,
                status: None,
            })
            .is_ok());
        assert_eq!(cursor.version(), StatusVersion::INITIAL);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn loop_reissues_with_new_version() {
        let service = ScriptedService::with(vec![
            response(1, true),
            response(1, false),
            response(4, true),
        ]);
        let sink = Rc::new(RefCell::new(RecordingSink::default()));

        let exit = run_status_loop(Rc::clone(&service), Rc::downgrade(&sink)).await;

        assert_eq!(exit, LoopExit::ServiceFailed(ServiceError::Disconnected));
        assert_eq!(
            *service.requested.borrow(),
            vec![
                StatusVersion::new(0),
                StatusVersion::new(1),
                StatusVersion::new(1),
                StatusVersion::new(4),
            ]
        );
        assert_eq!(
            sink.borrow().seen,
            vec![
                (StatusVersion::new(1), true),
                (StatusVersion::new(1), false),
                (StatusVersion::new(4), true),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn loop_stops_on_stale_version() {
        let service = ScriptedService::with(vec![response(2, true), response(2, true)]);
        let sink = Rc::new(RefCell::new(RecordingSink::default()));

        let exit = run_status_loop(service, Rc::downgrade(&sink)).await;

        assert!(matches!(
            exit,
            LoopExit::ContractViolation(SyncError::StaleVersion { .. })
        ));
        assert_eq!(sink.borrow().seen.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn loop_ends_when_owner_is_gone() {
        let service = ScriptedService::with(vec![response(1, true)]);
        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let weak = Rc::downgrade(&sink);
        drop(sink);

        let exit = run_status_loop(Rc::clone(&service), weak).await;

        assert_eq!(exit, LoopExit::OwnerDropped);
        assert!(service.requested.borrow().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn spawned_loop_reports_exit() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let service = ScriptedService::with(vec![response(1, true)]);
                let sink = Rc::new(RefCell::new(RecordingSink::default()));

                let handle = spawn_status_loop(service, Rc::downgrade(&sink));
                let exit = handle.finished().await;

                assert_eq!(
                    exit,
                    Some(LoopExit::ServiceFailed(ServiceError::Disconnected))
                );
                assert_eq!(sink.borrow().seen.len(), 1);
            })
            .await;
    }

    #[test]
    fn sync_error_display() {
        let err = SyncError::StaleVersion {
            last: StatusVersion::new(5),
            received: StatusVersion::new(4),
        };
        assert!(err.to_string().contains("v4"));
        assert!(err.to_string().contains("v5"));
    }
}
