// SPDX-License-Identifier: MPL-2.0
//! Domain layer - playback model with ZERO external dependencies.
//!
//! This module contains pure value types describing what the playback
//! service reports and how media time relates to clock time. It has no
//! dependencies on external crates (except `std`) to ensure testability.
//!
//! # Modules
//!
//! - [`playback`]: Timeline mapping ([`TimelineFunction`](playback::TimelineFunction)),
//!   status snapshots ([`PlayerStatus`](playback::PlayerStatus),
//!   [`Metadata`](playback::Metadata), [`Problem`](playback::Problem)) and
//!   derived states ([`PlaybackState`](playback::PlaybackState))

pub mod playback;
