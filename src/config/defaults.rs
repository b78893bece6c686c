// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Layout**: Margins and control-bar metrics in logical pixels
//! - **Colors**: Overlay colors as `0xAARRGGBB`
//! - **Keys**: HID usage codes bound to actions
//! - **Diagnostics**: Frame-rate logging period

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Space around the video and between the video and the controls.
pub const DEFAULT_MARGIN: f32 = 4.0;

/// Height of the controls bar below the video.
pub const DEFAULT_CONTROLS_HEIGHT: f32 = 36.0;

/// Width of the play/pause symbol.
pub const DEFAULT_SYMBOL_WIDTH: f32 = 24.0;

/// Height of the play/pause symbol.
pub const DEFAULT_SYMBOL_HEIGHT: f32 = 24.0;

/// Horizontal padding on each side of the play/pause symbol.
pub const DEFAULT_SYMBOL_PADDING: f32 = 12.0;

// ==========================================================================
// Color Defaults
// ==========================================================================

/// View background (Indigo 900).
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0xff1a_237e;

/// Controls bar background behind the progress bar and symbol.
pub const DEFAULT_CONTROLS_COLOR: u32 = 0xff00_0000;

/// Played part of the progress bar (Deep Purple 500).
pub const DEFAULT_PROGRESS_FOREGROUND_COLOR: u32 = 0xff67_3ab7;

/// Remaining part of the progress bar (Deep Purple 200).
pub const DEFAULT_PROGRESS_BACKGROUND_COLOR: u32 = 0xffb3_9ddb;

/// Play/pause symbol.
pub const DEFAULT_SYMBOL_COLOR: u32 = 0xffff_ffff;

// ==========================================================================
// Key Defaults
// ==========================================================================

/// HID usage for the space bar; toggles play/pause.
pub const DEFAULT_TOGGLE_KEY: u32 = 0x2c;

/// HID usage for the Q key; quits.
pub const DEFAULT_QUIT_KEY: u32 = 0x14;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Period between frame-rate log lines while playing. Zero disables them.
pub const DEFAULT_FRAME_RATE_LOG_INTERVAL_SECS: u32 = 5;
