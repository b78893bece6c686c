// SPDX-License-Identifier: MPL-2.0
//! Application layer - boundaries to the outside world.
//!
//! - [`port`]: Trait definitions for the playback service and the view host
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The view (`ui`) drives the ports and never names a concrete adapter
//!
//! # Example
//!
//! ```ignore
//! use media_player_view::application::port::{PlaybackService, ViewHost};
//!
//! // Infrastructure implements the port traits
//! struct IpcPlayer { /* ... */ }
//! impl PlaybackService for IpcPlayer { /* ... */ }
//! ```

pub mod port;
