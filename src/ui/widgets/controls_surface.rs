// SPDX-License-Identifier: MPL-2.0
//! Double-buffered raster surface for the controls bar.
//!
//! The caller acquires a canvas on the back buffer, paints it in logical
//! pixels, then releases it, which swaps buffers so the freshly painted
//! pixmap becomes the front one handed to the compositor. Device scale is
//! applied through the canvas transform, so painting code never sees
//! physical pixels.

use crate::ui::controls::ControlsCanvas;
use iced_core::{Color, Point, Rectangle};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

#[derive(Debug, Default)]
pub struct ControlsSurface {
    front: Option<Pixmap>,
    back: Option<Pixmap>,
}

impl ControlsSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares the back buffer for a logical `width` x `height` canvas at
    /// the given device scale.
    ///
    /// Returns `None` when the physical size is empty or cannot be allocated.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn acquire_canvas(
        &mut self,
        width: f32,
        height: f32,
        scale_x: f32,
        scale_y: f32,
    ) -> Option<PixmapCanvas<'_>> {
        let physical_width = (width * scale_x).ceil().max(0.0) as u32;
        let physical_height = (height * scale_y).ceil().max(0.0) as u32;

        let reusable = self
            .back
            .as_ref()
            .is_some_and(|p| p.width() == physical_width && p.height() == physical_height);
        if !reusable {
            self.back = Some(Pixmap::new(physical_width, physical_height)?);
        }

        let pixmap = self.back.as_mut()?;
        Some(PixmapCanvas {
            pixmap,
            transform: Transform::from_scale(scale_x, scale_y),
        })
    }

    /// Publishes the back buffer painted since the last acquire.
    pub fn release_and_swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// The most recently published pixmap.
    #[must_use]
    pub fn front(&self) -> Option<&Pixmap> {
        self.front.as_ref()
    }
}

/// [`ControlsCanvas`] drawing into a tiny-skia pixmap.
pub struct PixmapCanvas<'a> {
    pixmap: &'a mut Pixmap,
    transform: Transform,
}

impl ControlsCanvas for PixmapCanvas<'_> {
    fn clear(&mut self, color: Color) {
        if let Some(color) = to_skia(color) {
            self.pixmap.fill(color);
        }
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        let Some(paint) = paint(color) else {
            return;
        };
        let Some(rect) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        self.pixmap.fill_rect(rect, &paint, self.transform, None);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let (Some(paint), Some((first, rest))) = (paint(color), points.split_first()) else {
            return;
        };

        let mut builder = PathBuilder::new();
        builder.move_to(first.x, first.y);
        for point in rest {
            builder.line_to(point.x, point.y);
        }
        builder.close();

        if let Some(path) = builder.finish() {
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, self.transform, None);
        }
    }
}

fn to_skia(color: Color) -> Option<tiny_skia::Color> {
    tiny_skia::Color::from_rgba(color.r, color.g, color.b, color.a)
}

fn paint(color: Color) -> Option<Paint<'static>> {
    let mut paint = Paint::default();
    paint.set_color(to_skia(color)?);
    paint.anti_alias = true;
    Some(paint)
}
