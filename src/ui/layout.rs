// SPDX-License-Identifier: MPL-2.0
//! Layout of the video, controls bar and progress bar.
//!
//! ```text
//! ┌──────────────────────── view ─────────────────────────┐
//! │              ┌────────── content ──────────┐          │
//! │              │                             │          │
//! │              │            video            │          │
//! │              │                             │          │
//! │              └─────────────────────────────┘          │
//! │               margin                                  │
//! │              ┌──────┬──── controls ────────┐          │
//! │              │ ▶/❚❚ │      progress bar    │          │
//! │              └──────┴──────────────────────┘          │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The video keeps its display aspect ratio (frame size times pixel aspect
//! ratio) and the whole block is centered in the view.

use crate::config::LayoutConfig;
use crate::domain::playback::{PixelAspectRatio, VideoSize};
use iced_core::{Rectangle, Size};

/// Fixed metrics of the controls bar, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub margin: f32,
    pub controls_height: f32,
    pub symbol_width: f32,
    pub symbol_height: f32,
    pub symbol_padding: f32,
}

impl LayoutMetrics {
    /// Width of the leading zone of the controls bar holding the symbol.
    #[must_use]
    pub fn symbol_zone_width(&self) -> f32 {
        self.symbol_width + self.symbol_padding * 2.0
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for LayoutMetrics {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            margin: config.margin,
            controls_height: config.controls_height,
            symbol_width: config.symbol_width,
            symbol_height: config.symbol_height,
            symbol_padding: config.symbol_padding,
        }
    }
}

/// Rectangles produced by one layout pass, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// The whole view; the background fills it.
    pub view_rect: Rectangle,
    /// Where the video surface goes.
    pub content_rect: Rectangle,
    /// Controls bar directly below the video.
    pub controls_rect: Rectangle,
    /// Hit region of the progress bar inside the controls bar.
    pub progress_bar_rect: Rectangle,
}

/// Result of [`LayoutEngine::layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPass {
    pub geometry: Geometry,
    /// New size for the hosted video view, or `None` if unchanged since the
    /// last pass.
    pub child_size: Option<Size>,
}

/// Returns true if `rect` contains the point, edges included.
#[must_use]
pub fn contains(rect: &Rectangle, x: f32, y: f32) -> bool {
    rect.x <= x && rect.y <= y && rect.x + rect.width >= x && rect.y + rect.height >= y
}

/// Computes geometry and gates child-view size updates.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
    /// Last size sent to the child view.
    last_child_size: Option<Size>,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            last_child_size: None,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Computes the geometry for a container size and video format.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(
        &self,
        container: Size,
        video_size: VideoSize,
        pixel_aspect_ratio: PixelAspectRatio,
    ) -> Geometry {
        let m = &self.metrics;

        // Room for the video after reserving space for decorations.
        let max_width = (container.width - m.margin * 2.0).max(0.0);
        let max_height = (container.height - m.controls_height - m.margin * 3.0).max(0.0);

        let frame = video_size.or_default_dimensions();
        let video_width =
            (u64::from(frame.width) * u64::from(pixel_aspect_ratio.width.max(1))) as f32;
        let video_height =
            (u64::from(frame.height) * u64::from(pixel_aspect_ratio.height.max(1))) as f32;

        // Cross-multiplied comparison of aspect ratios picks the binding axis.
        let (content_width, content_height) =
            if max_width * video_height < max_height * video_width {
                (max_width, video_height * max_width / video_width)
            } else {
                (video_width * max_height / video_height, max_height)
            };

        let block_height = content_height + m.controls_height + m.margin;
        let block_x = (container.width - content_width) / 2.0;
        let block_y = (container.height - block_height) / 2.0;

        let content_rect = Rectangle {
            x: block_x,
            y: block_y,
            width: content_width,
            height: content_height,
        };

        let controls_rect = Rectangle {
            x: content_rect.x,
            y: content_rect.y + content_rect.height + m.margin,
            width: content_rect.width,
            height: m.controls_height,
        };

        let symbol_zone = m.symbol_zone_width();
        let progress_bar_rect = Rectangle {
            x: controls_rect.x + symbol_zone,
            y: controls_rect.y,
            width: (controls_rect.width - symbol_zone).max(0.0),
            height: controls_rect.height,
        };

        Geometry {
            view_rect: Rectangle {
                x: 0.0,
                y: 0.0,
                width: container.width,
                height: container.height,
            },
            content_rect,
            controls_rect,
            progress_bar_rect,
        }
    }

    /// Computes the geometry and reports whether the child view needs a new size.
    pub fn layout(
        &mut self,
        container: Size,
        video_size: VideoSize,
        pixel_aspect_ratio: PixelAspectRatio,
    ) -> LayoutPass {
        let geometry = self.compute(container, video_size, pixel_aspect_ratio);
        let size = geometry.content_rect.size();

        let child_size = if self.last_child_size == Some(size) {
            None
        } else {
            self.last_child_size = Some(size);
            Some(size)
        };

        LayoutPass {
            geometry,
            child_size,
        }
    }

    /// Forgets the last size sent to the child view, so the next pass sends
    /// one again.
    pub fn reset_child_size(&mut self) {
        self.last_child_size = None;
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}
