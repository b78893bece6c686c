// SPDX-License-Identifier: MPL-2.0
//! Test doubles for the service and host ports shared by unit tests.

use crate::application::port::{ChildKey, PlaybackService, ServiceError, SurfaceHandle, ViewHost};
use crate::domain::playback::{PlayerCommand, StatusResponse, StatusVersion};
use futures_util::future::LocalBoxFuture;
use iced_core::{Point, Size};
use std::cell::RefCell;

/// Default epsilon for f32 comparisons.
pub const F32_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    AddChild(ChildKey, SurfaceHandle),
    AttachNode(ChildKey),
    DetachNode(ChildKey),
    SetChildProperties(ChildKey, Size),
    SetChildOrigin(ChildKey, Point),
    RemoveChild(ChildKey),
    Invalidate,
    Quit,
}

/// Host that records every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl ViewHost for RecordingHost {
    fn add_child(&mut self, key: ChildKey, handle: SurfaceHandle) {
        self.calls.push(HostCall::AddChild(key, handle));
    }

    fn attach_child_node(&mut self, key: ChildKey) {
        self.calls.push(HostCall::AttachNode(key));
    }

    fn detach_child_node(&mut self, key: ChildKey) {
        self.calls.push(HostCall::DetachNode(key));
    }

    fn set_child_properties(&mut self, key: ChildKey, size: Size) {
        self.calls.push(HostCall::SetChildProperties(key, size));
    }

    fn set_child_origin(&mut self, key: ChildKey, origin: Point) {
        self.calls.push(HostCall::SetChildOrigin(key, origin));
    }

    fn remove_child(&mut self, key: ChildKey) {
        self.calls.push(HostCall::RemoveChild(key));
    }

    fn invalidate_scene(&mut self) {
        self.calls.push(HostCall::Invalidate);
    }

    fn request_quit(&mut self) {
        self.calls.push(HostCall::Quit);
    }
}

/// Service that records commands and never answers status requests.
#[derive(Debug, Default)]
pub struct RecordingService {
    pub commands: RefCell<Vec<PlayerCommand>>,
    pub status_requests: RefCell<Vec<StatusVersion>>,
}

impl RecordingService {
    pub fn take_commands(&self) -> Vec<PlayerCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    fn record(&self, command: PlayerCommand) -> Result<(), ServiceError> {
        self.commands.borrow_mut().push(command);
        Ok(())
    }
}

impl PlaybackService for RecordingService {
    fn set_url(&self, url: &str) -> Result<(), ServiceError> {
        self.record(PlayerCommand::SetUrl(url.to_string()))
    }

    fn play(&self) -> Result<(), ServiceError> {
        self.record(PlayerCommand::Play)
    }

    fn pause(&self) -> Result<(), ServiceError> {
        self.record(PlayerCommand::Pause)
    }

    fn seek(&self, position_ns: i64) -> Result<(), ServiceError> {
        self.record(PlayerCommand::Seek(position_ns))
    }

    fn get_status(
        &self,
        last_version: StatusVersion,
    ) -> LocalBoxFuture<'static, Result<StatusResponse, ServiceError>> {
        self.status_requests.borrow_mut().push(last_version);
        Box::pin(futures_util::future::pending())
    }
}
