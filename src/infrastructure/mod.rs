// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`loopback`]: In-process [`PlaybackService`] backed by tokio channels
//!
//! [`PlaybackService`]: crate::application::port::PlaybackService

pub mod loopback;

pub use loopback::{loopback, LoopbackController, LoopbackPlaybackService};
