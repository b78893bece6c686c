// SPDX-License-Identifier: MPL-2.0
//! `media_player_view` keeps an embedded video view, its play/pause control and
//! its progress bar consistent with a remote playback service.
//!
//! The service only answers long-poll status requests, so the view
//! extrapolates the playback position between updates from a timeline
//! function, derives its state from confirmed status only, and re-flows its
//! layout whenever the container or the video format changes.
//!
//! # Layers
//!
//! - [`domain`] - Status data model, timeline function and playback states
//! - [`application`] - Ports for the playback service and the view host
//! - [`video_player`] - Status sync loop, state machine, clock, frame-rate meter
//! - [`ui`] - Layout, input routing, controls painting and the composed view
//! - [`infrastructure`] - In-process loopback service
//! - [`config`] - Persistent settings
//!
//! Everything runs on one thread; the status loop is a tokio local task.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod video_player;

#[cfg(test)]
mod test_utils;
