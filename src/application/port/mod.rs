// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`playback`]: Remote playback engine (transport commands, status long-poll)
//! - [`view_host`]: Compositor hosting the view and its video child
//!
//! # Design Notes
//!
//! - Traits use domain types and `iced_core` geometry only
//! - Nothing here is `Send`: the view lives on one event thread
//! - Status is the only reply channel; commands never return results

pub mod playback;
pub mod view_host;

// Re-export main types for convenience
pub use playback::{PlaybackService, ServiceError};
pub use view_host::{ChildKey, SurfaceHandle, ViewHost};
