// SPDX-License-Identifier: MPL-2.0
//! Playback domain types: timeline mapping, status snapshots and states.

pub mod state;
pub mod status;
pub mod timeline;

pub use state::{PlaybackState, PlayerCommand};
pub use status::{
    Metadata, PixelAspectRatio, PlayerStatus, Problem, StatusResponse, StatusVersion, VideoSize,
    DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH,
};
pub use timeline::{TimelineError, TimelineFunction, TimelineTransform};
