// SPDX-License-Identifier: MPL-2.0
//! Maps pointer and keyboard input onto player commands.
//!
//! Routing is a pure function of the event, the current geometry and the
//! playback state. The router never sends anything itself; it returns the
//! actions for the view to carry out, along with whether the event was
//! consumed. Unhandled events are left for the host's own dispatch.

use crate::config::KeyConfig;
use crate::domain::playback::{PlaybackState, PlayerCommand};
use crate::ui::layout::{contains, Geometry};
use crate::video_player::PlaybackStateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Pointer event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Pressed,
    Released,
}

/// Keyboard event identified by its USB HID usage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub phase: KeyPhase,
    pub hid_usage: u32,
}

impl KeyboardEvent {
    #[must_use]
    pub fn pressed(hid_usage: u32) -> Self {
        Self {
            phase: KeyPhase::Pressed,
            hid_usage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Keyboard(KeyboardEvent),
}

/// HID usages bound to view actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub toggle: u32,
    pub quit: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from(&KeyConfig::default())
    }
}

impl From<&KeyConfig> for KeyBindings {
    fn from(config: &KeyConfig) -> Self {
        Self {
            toggle: config.toggle,
            quit: config.quit,
        }
    }
}

/// Something the view should do in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Send a command to the playback service.
    Command(PlayerCommand),
    /// Ask the host to quit.
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub handled: bool,
    pub actions: Vec<InputAction>,
}

impl InputOutcome {
    fn unhandled() -> Self {
        Self::default()
    }

    fn handled(actions: Vec<InputAction>) -> Self {
        Self {
            handled: true,
            actions,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    bindings: KeyBindings,
}

impl InputRouter {
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    #[must_use]
    pub fn bindings(&self) -> KeyBindings {
        self.bindings
    }

    /// Routes one event. `geometry` is `None` until the first layout pass.
    #[must_use]
    pub fn route(
        &self,
        event: &InputEvent,
        geometry: Option<&Geometry>,
        playback: &PlaybackStateMachine,
    ) -> InputOutcome {
        match event {
            InputEvent::Pointer(pointer) => Self::route_pointer(pointer, geometry, playback),
            InputEvent::Keyboard(key) => self.route_key(key, playback),
        }
    }

    fn route_pointer(
        pointer: &PointerEvent,
        geometry: Option<&Geometry>,
        playback: &PlaybackStateMachine,
    ) -> InputOutcome {
        if pointer.phase != PointerPhase::Down {
            return InputOutcome::unhandled();
        }

        if let (Some(geometry), Some(metadata)) = (geometry, playback.metadata()) {
            let bar = &geometry.progress_bar_rect;
            if contains(bar, pointer.x, pointer.y) {
                let target = seek_target(pointer.x - bar.x, bar.width, metadata.duration);
                let mut actions = vec![InputAction::Command(PlayerCommand::Seek(target))];
                if playback.state() != PlaybackState::Playing {
                    actions.push(InputAction::Command(PlayerCommand::Play));
                }
                return InputOutcome::handled(actions);
            }
        }

        InputOutcome::handled(vec![InputAction::Command(playback.toggle_command())])
    }

    fn route_key(&self, key: &KeyboardEvent, playback: &PlaybackStateMachine) -> InputOutcome {
        if key.phase != KeyPhase::Pressed {
            return InputOutcome::unhandled();
        }

        if key.hid_usage == self.bindings.toggle {
            InputOutcome::handled(vec![InputAction::Command(playback.toggle_command())])
        } else if key.hid_usage == self.bindings.quit {
            InputOutcome::handled(vec![InputAction::Quit])
        } else {
            InputOutcome::unhandled()
        }
    }
}

/// Media position for a pointer `offset` pixels into a bar of `width` pixels.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn seek_target(offset: f32, width: f32, duration: u64) -> i64 {
    if width <= 0.0 {
        return 0;
    }
    let fraction = (f64::from(offset) / f64::from(width)).clamp(0.0, 1.0);
    (fraction * duration as f64) as i64
}
