// SPDX-License-Identifier: MPL-2.0
//! Lifecycle of the hosted video surface.
//!
//! ```text
//!            register()             on_attached()
//! Absent ─────────────────▶ Pending ─────────────▶ Attached
//!                              │                      │
//!                              └──── on_unavailable() ┴──▶ Lost
//! ```
//!
//! Losing the surface is not fatal: the controls keep working and the view
//! continues as an audio-only presentation.

use crate::application::port::{ChildKey, SurfaceHandle, ViewHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildViewState {
    /// Nothing registered yet.
    #[default]
    Absent,
    /// Registered with the host, waiting for it to attach.
    Pending,
    Attached,
    /// The surface died; its registration has been removed.
    Lost,
}

/// Tracks the single child view owned by the player view.
#[derive(Debug, Clone)]
pub struct ChildViewLifecycle {
    key: ChildKey,
    state: ChildViewState,
    handle: Option<SurfaceHandle>,
}

impl ChildViewLifecycle {
    #[must_use]
    pub fn new(key: ChildKey) -> Self {
        Self {
            key,
            state: ChildViewState::Absent,
            handle: None,
        }
    }

    #[must_use]
    pub fn key(&self) -> ChildKey {
        self.key
    }

    #[must_use]
    pub fn state(&self) -> ChildViewState {
        self.state
    }

    #[must_use]
    pub fn handle(&self) -> Option<SurfaceHandle> {
        self.handle
    }

    /// Whether a surface is registered and may receive size updates.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.handle.is_some()
    }

    /// Registers `handle` with the host and parents its node under the view.
    pub fn register<H: ViewHost + ?Sized>(&mut self, host: &mut H, handle: SurfaceHandle) {
        if self.handle.is_some() {
            log::warn!("Replacing video surface for child key {}", self.key.0);
            host.detach_child_node(self.key);
            host.remove_child(self.key);
        }
        host.attach_child_node(self.key);
        host.add_child(self.key, handle);
        self.handle = Some(handle);
        self.state = ChildViewState::Pending;
    }

    /// Handles the host reporting that `key` attached.
    ///
    /// Returns true if the key is ours; the caller must then re-run layout.
    pub fn on_attached<H: ViewHost + ?Sized>(&mut self, host: &mut H, key: ChildKey) -> bool {
        if !self.owns(key) {
            return false;
        }
        host.attach_child_node(key);
        self.state = ChildViewState::Attached;
        true
    }

    /// Handles the host reporting that the surface for `key` died.
    ///
    /// Returns true if the key is ours; the caller must then re-run layout.
    pub fn on_unavailable<H: ViewHost + ?Sized>(&mut self, host: &mut H, key: ChildKey) -> bool {
        if !self.owns(key) {
            return false;
        }
        log::error!("Video view died unexpectedly");
        host.detach_child_node(key);
        self.handle = None;
        host.remove_child(key);
        self.state = ChildViewState::Lost;
        true
    }

    fn owns(&self, key: ChildKey) -> bool {
        if key != self.key || self.handle.is_none() {
            log::debug!("Ignoring event for child key {} we do not hold", key.0);
            return false;
        }
        true
    }
}

impl Default for ChildViewLifecycle {
    fn default() -> Self {
        Self::new(ChildKey::VIDEO)
    }
}
