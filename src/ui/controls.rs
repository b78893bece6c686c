// SPDX-License-Identifier: MPL-2.0
//! Painting of the controls bar: play/pause symbol and progress bar.
//!
//! Painting goes through the [`ControlsCanvas`] trait so the same routine can
//! drive a raster surface or a recorder. Coordinates are local to the
//! controls rectangle, in logical pixels.

use crate::config::ColorConfig;
use crate::domain::playback::PlaybackState;
use crate::ui::layout::LayoutMetrics;
use iced_core::{Color, Point, Rectangle, Size};

/// Drawing surface for the controls bar.
pub trait ControlsCanvas {
    /// Fills the whole canvas with `color`.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rectangle, color: Color);

    /// Fills the closed polygon through `points`.
    fn fill_polygon(&mut self, points: &[Point], color: Color);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rectangle, Color),
    FillPolygon(Vec<Point>, Color),
}

/// Canvas that records operations instead of rasterizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlsCanvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::FillPolygon(points.to_vec(), color));
    }
}

/// Colors used to paint the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsPalette {
    pub background: Color,
    pub controls: Color,
    pub progress_foreground: Color,
    pub progress_background: Color,
    pub symbol: Color,
}

impl Default for ControlsPalette {
    fn default() -> Self {
        Self::from(&ColorConfig::default())
    }
}

impl From<&ColorConfig> for ControlsPalette {
    fn from(config: &ColorConfig) -> Self {
        Self {
            background: argb_to_color(config.background),
            controls: argb_to_color(config.controls),
            progress_foreground: argb_to_color(config.progress_foreground),
            progress_background: argb_to_color(config.progress_background),
            symbol: argb_to_color(config.symbol),
        }
    }
}

/// Converts a `0xAARRGGBB` value.
#[must_use]
pub fn argb_to_color(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes();
    Color::from_rgba8(r, g, b, f32::from(a) / 255.0)
}

/// Paints the controls bar of `size` onto `canvas`.
///
/// `progress` is clamped to `[0.0, 1.0]`.
pub fn paint_controls<C: ControlsCanvas + ?Sized>(
    canvas: &mut C,
    size: Size,
    metrics: &LayoutMetrics,
    palette: &ControlsPalette,
    state: PlaybackState,
    progress: f32,
) {
    canvas.clear(palette.controls);

    let bar_left = metrics.symbol_zone_width();
    let bar_width = (size.width - bar_left).max(0.0);
    canvas.fill_rect(
        Rectangle {
            x: bar_left,
            y: 0.0,
            width: bar_width,
            height: size.height,
        },
        palette.progress_background,
    );
    canvas.fill_rect(
        Rectangle {
            x: bar_left,
            y: 0.0,
            width: bar_width * progress.clamp(0.0, 1.0),
            height: size.height,
        },
        palette.progress_foreground,
    );

    let left = metrics.symbol_padding;
    let top = (size.height - metrics.symbol_height) / 2.0;
    let width = metrics.symbol_width;
    let height = metrics.symbol_height;

    if state.is_playing() {
        // Pause: two bars, each a third of the symbol width.
        for x in [left, left + 2.0 * width / 3.0] {
            canvas.fill_rect(
                Rectangle {
                    x,
                    y: top,
                    width: width / 3.0,
                    height,
                },
                palette.symbol,
            );
        }
    } else {
        canvas.fill_polygon(
            &[
                Point::new(left, top),
                Point::new(left, top + height),
                Point::new(left + width, top + height / 2.0),
            ],
            palette.symbol,
        );
    }
}
