//! Scrolling for panels taller than their viewport.
//!
//! The only state is the content offset (`<= 0`, content moves up as it
//! grows more negative). Wheel and scrollbar drags both map onto that offset;
//! the scrollbar position, content translation and clip rectangle are derived
//! from it. Each update is O(1) and never touches the layout.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect, constrain};

pub const SCROLLBAR_WIDTH: f64 = 4.0;
pub const SCROLLBAR_HEIGHT: f64 = 20.0;
pub const SCROLLBAR_MARGIN: f64 = 4.0;
pub const SCROLLBAR_COLOR: &str = "#808BA4";

/// Geometry after a scroll update, in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollFrame {
    /// Vertical translation of the content layer.
    pub content_offset: f64,
    pub scrollbar: Rect,
    /// Viewport in content coordinates; moves opposite to the content so the
    /// visible window stays put.
    pub clip: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollController {
    content_height: f64,
    visible_height: f64,
    panel_width: f64,
    border_width: f64,
    offset: f64,
}

impl ScrollController {
    /// A controller for content of `content_height` shown through a viewport of
    /// `visible_height`, or `None` when everything fits. `initial_offset` is
    /// clamped into the valid range.
    pub fn new(
        content_height: f64,
        visible_height: f64,
        panel_width: f64,
        border_width: f64,
        initial_offset: f64,
    ) -> Option<Self> {
        if content_height.partial_cmp(&visible_height) != Some(std::cmp::Ordering::Greater) {
            return None;
        }
        let mut c = Self {
            content_height,
            visible_height,
            panel_width,
            border_width,
            offset: 0.0,
        };
        c.set_offset(initial_offset);
        Some(c)
    }

    /// How far the content can move.
    pub fn scrollable_height(&self) -> f64 {
        self.content_height - self.visible_height
    }

    /// Travel of the scrollbar thumb; never below one pixel.
    pub fn track_length(&self) -> f64 {
        (self.visible_height - SCROLLBAR_HEIGHT - 2.0 * SCROLLBAR_MARGIN).max(1.0)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn visible_height(&self) -> f64 {
        self.visible_height
    }

    fn set_offset(&mut self, offset: f64) {
        let v = if offset.is_finite() { offset } else { 0.0 };
        self.offset = constrain(v, -self.scrollable_height(), 0.0);
    }

    fn thumb_y(&self) -> f64 {
        SCROLLBAR_MARGIN - self.offset / self.scrollable_height() * self.track_length()
    }

    /// Apply a wheel delta (pixels, positive scrolls down).
    pub fn wheel(&mut self, delta_y: f64) -> ScrollFrame {
        if delta_y.is_finite() {
            let next = self.offset - delta_y / self.track_length() * self.scrollable_height();
            self.set_offset(next);
        }
        self.frame()
    }

    /// Move the thumb so its centre follows `pointer_y` (panel coordinates).
    pub fn drag_to(&mut self, pointer_y: f64) -> ScrollFrame {
        if pointer_y.is_finite() {
            let track = self.track_length();
            let thumb = constrain(
                pointer_y - SCROLLBAR_HEIGHT / 2.0,
                SCROLLBAR_MARGIN,
                SCROLLBAR_MARGIN + track,
            );
            let next = -(thumb - SCROLLBAR_MARGIN) / track * self.scrollable_height();
            self.set_offset(next);
        }
        self.frame()
    }

    pub fn frame(&self) -> ScrollFrame {
        let bw = self.border_width;
        ScrollFrame {
            content_offset: self.offset,
            scrollbar: Rect::new(
                self.panel_width,
                self.thumb_y(),
                SCROLLBAR_WIDTH,
                SCROLLBAR_HEIGHT,
            ),
            clip: Rect::new(
                bw,
                bw - self.offset,
                self.panel_width,
                (self.visible_height - 2.0 * bw).max(0.0),
            ),
        }
    }

    /// Whether `(x, y)` (panel coordinates) is on the scrollbar thumb.
    pub fn hits_thumb(&self, x: f64, y: f64) -> bool {
        self.frame().scrollbar.contains(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_content_needs_no_controller() {
        assert!(ScrollController::new(100.0, 100.0, 50.0, 0.0, 0.0).is_none());
        assert!(ScrollController::new(f64::NAN, 100.0, 50.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn thumb_tracks_offset_ends() {
        let mut c = ScrollController::new(300.0, 100.0, 80.0, 0.0, 0.0).unwrap();
        assert_eq!(c.frame().scrollbar.y, SCROLLBAR_MARGIN);
        c.wheel(1e9);
        assert_eq!(c.offset(), -200.0);
        assert_eq!(c.frame().scrollbar.y, SCROLLBAR_MARGIN + c.track_length());
    }
}
