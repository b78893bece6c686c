// SPDX-License-Identifier: MPL-2.0
//! View layer: layout, input, controls painting and the composed view.
//!
//! # Modules
//!
//! - [`layout`] - Geometry of the video, controls bar and progress bar
//! - [`input`] - Pointer and keyboard routing to player commands
//! - [`child_view`] - Lifecycle of the hosted video surface
//! - [`controls`] - Painting of the play/pause symbol and progress bar
//! - [`widgets`] - Raster surface the controls are painted into
//! - [`media_player_view`] - The view tying everything to the service and host

pub mod child_view;
pub mod controls;
pub mod input;
pub mod layout;
pub mod media_player_view;
pub mod widgets;

pub use media_player_view::MediaPlayerView;
