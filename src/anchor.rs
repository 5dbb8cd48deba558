//! Anchor resolution: fractional position + anchor edges -> absolute panel
//! position on the canvas, kept inside the canvas bounds.

use serde::{Deserialize, Serialize};

use crate::models::CanvasBounds;
use crate::options::{LegendOptions, XAnchor, YAnchor};

/// Where the panel ends up and how much of it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelPosition {
    /// Top-left corner in canvas coordinates.
    pub x: f64,
    pub y: f64,
    /// Panel width after clipping to the plot area.
    pub width: f64,
    /// Height of the viewport; smaller than the panel height when it overflows.
    pub visible_height: f64,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Unclamped top-left corner implied by the fractions and anchors.
pub fn anchored_origin(
    width: f64,
    height: f64,
    options: &LegendOptions,
    canvas: &CanvasBounds,
) -> (f64, f64) {
    let mut lx = canvas.margin_left + canvas.available_width * finite_or_zero(options.x);
    let mut ly = canvas.margin_top + canvas.available_height * (1.0 - finite_or_zero(options.y));

    match options.anchor_x {
        XAnchor::Right => lx -= width,
        XAnchor::Center => lx -= width / 2.0,
        XAnchor::Left => {}
    }
    match options.anchor_y {
        YAnchor::Bottom => ly -= height,
        YAnchor::Middle => ly -= height / 2.0,
        YAnchor::Top => {}
    }
    (lx, ly)
}

/// Resolve the panel position for a laid-out panel of `width × height`.
///
/// - Wider than the plot area: pinned to the plot's left edge and clipped to
///   the plot width. Otherwise shifted just enough to keep both edges on the
///   canvas.
/// - Taller than the plot area: pinned to the plot's top edge with the
///   viewport limited to the plot height (the content scrolls instead of
///   growing). Otherwise shifted onto the canvas and cut at its bottom edge.
pub fn resolve_position(
    width: f64,
    height: f64,
    options: &LegendOptions,
    canvas: &CanvasBounds,
) -> PanelPosition {
    let (mut lx, mut ly) = anchored_origin(width, height, options, canvas);

    let mut visible_width = width;
    if width > canvas.available_width {
        lx = canvas.margin_left;
        visible_width = canvas.available_width;
    } else {
        if lx + width > canvas.width {
            lx = canvas.width - width;
        }
        if lx < 0.0 {
            lx = 0.0;
        }
    }

    let visible_height;
    if height > canvas.available_height {
        ly = canvas.margin_top;
        visible_height = canvas.available_height;
    } else {
        if ly + height > canvas.height {
            ly = canvas.height - height;
        }
        if ly < 0.0 {
            ly = 0.0;
        }
        visible_height = (canvas.height - ly).min(height);
    }

    PanelPosition {
        x: lx,
        y: ly,
        width: visible_width,
        visible_height,
    }
}
