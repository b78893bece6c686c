// SPDX-License-Identifier: MPL-2.0
pub mod controls_surface;

pub use controls_surface::{ControlsSurface, PixmapCanvas};
