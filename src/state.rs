//! The computed legend: everything one pass produces, rebuilt from scratch on
//! every redraw.

use serde::{Deserialize, Serialize};

use crate::anchor::{PanelPosition, resolve_position};
use crate::geom::Point;
use crate::layout::{EntryPlacement, LegendLayout, layout};
use crate::margin::{MarginReservation, reservation_for};
use crate::models::CanvasBounds;
use crate::options::{FontConfig, LegendOptions, Orientation, XAnchor, YAnchor};
use crate::scroll::ScrollController;
use crate::source::LegendGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendState {
    pub orientation: Orientation,
    pub grouped: bool,
    pub anchor_x: XAnchor,
    pub anchor_y: YAnchor,
    pub frac_x: f64,
    pub frac_y: f64,
    pub border_width: f64,
    pub group_gap: f64,
    pub computed_width: f64,
    pub computed_height: f64,
    /// `<= 0`; zero whenever the panel does not scroll.
    pub scroll_offset: f64,
    pub layout: LegendLayout,
    pub position: PanelPosition,
    pub margin: MarginReservation,
    /// Present only for interactive panels taller than their viewport.
    pub scroll: Option<ScrollController>,
    pub font: FontConfig,
    pub bg_color: String,
    pub border_color: String,
}

/// Build the state for already measured groups.
///
/// `prior_offset` is the scroll offset of the previous state; it is re-clamped
/// into the new scroll range (and dropped when the panel no longer scrolls).
pub fn compute_state(
    groups: &[LegendGroup],
    options: &LegendOptions,
    canvas: &CanvasBounds,
    static_export: bool,
    prior_offset: f64,
) -> LegendState {
    let layout = layout(groups, options, canvas.available_width);
    let position = resolve_position(layout.width, layout.height, options, canvas);
    let margin = reservation_for(layout.width, layout.height, canvas.height, options);

    let scroll = if static_export {
        None
    } else {
        ScrollController::new(
            layout.height,
            position.visible_height,
            position.width,
            options.border_width,
            prior_offset,
        )
    };
    let scroll_offset = scroll.as_ref().map_or(0.0, ScrollController::offset);

    LegendState {
        orientation: options.orientation,
        grouped: options.grouped,
        anchor_x: options.anchor_x,
        anchor_y: options.anchor_y,
        frac_x: options.x,
        frac_y: options.y,
        border_width: options.border_width,
        group_gap: options.group_gap,
        computed_width: layout.width,
        computed_height: layout.height,
        scroll_offset,
        layout,
        position,
        margin,
        scroll,
        font: options.font.clone(),
        bg_color: options.bg_color.clone(),
        border_color: options.border_color.clone(),
    }
}

impl LegendState {
    pub fn is_scrollable(&self) -> bool {
        self.scroll.is_some()
    }

    /// Entry by flat index (group order, then entry order).
    pub fn entry(&self, index: usize) -> Option<&EntryPlacement> {
        self.layout.entries().nth(index)
    }

    /// Convert canvas coordinates to panel coordinates.
    pub fn to_panel(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.position.x, y - self.position.y)
    }

    /// Flat index of the entry whose hit region contains canvas point `(x, y)`.
    /// Points outside the visible viewport never hit, even if some scrolled-away
    /// entry would contain them. Where regions overlap the entry painted last
    /// wins.
    pub fn entry_at(&self, x: f64, y: f64) -> Option<usize> {
        let p = self.to_panel(x, y);
        if p.x < 0.0
            || p.y < 0.0
            || p.x > self.position.width
            || p.y > self.position.visible_height
        {
            return None;
        }
        // content layer is translated by the scroll offset
        let content = Point::new(p.x, p.y - self.scroll_offset);
        self.layout
            .groups
            .iter()
            .flat_map(|g| g.entries.iter().map(move |e| (g.offset, e)))
            .enumerate()
            .filter(|(_, (group_offset, e))| {
                let origin = group_offset.offset(e.offset);
                e.hit_region.translated(origin).contains(content)
            })
            .map(|(index, _)| index)
            .last()
    }

    /// Apply a wheel delta; returns whether anything moved.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        match self.scroll.as_mut() {
            Some(s) => {
                let before = s.offset();
                let frame = s.wheel(delta_y);
                self.scroll_offset = frame.content_offset;
                before != frame.content_offset
            }
            None => false,
        }
    }

    /// Drag the scrollbar thumb to canvas `y`.
    pub fn drag_to(&mut self, y: f64) -> bool {
        let pointer_y = y - self.position.y;
        match self.scroll.as_mut() {
            Some(s) => {
                let before = s.offset();
                let frame = s.drag_to(pointer_y);
                self.scroll_offset = frame.content_offset;
                before != frame.content_offset
            }
            None => false,
        }
    }
}
