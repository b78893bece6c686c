// SPDX-License-Identifier: MPL-2.0
//! Playback synchronization engine.
//!
//! This module keeps a local picture of the remote player: a status long-poll
//! loop on a tokio local task feeds a state machine, and a reference clock lets
//! the view extrapolate the position between updates.

pub mod clock;
pub mod frame_rate;
mod state;
pub mod sync;

pub use clock::{local_now, Clock, ManualClock, MonotonicClock};
pub use frame_rate::FrameRateMeter;
pub use state::{PlaybackStateMachine, StatusEffects};
pub use sync::{
    run_status_loop, spawn_status_loop, LoopExit, StatusCursor, StatusLoopHandle, StatusSink,
    SyncError,
};
