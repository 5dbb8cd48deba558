//! Typed scene tree handed to the paint layer.
//!
//! Built once per pass (and cheaply rebuilt after a scroll) from a
//! [`LegendState`]. Coordinates of the background, clip and scrollbar are
//! panel-relative; group offsets are relative to the content layer, which is
//! translated vertically by `content_offset`; entry offsets are relative to
//! their group.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::options::FontConfig;
use crate::scroll::{SCROLLBAR_COLOR, SCROLLBAR_MARGIN, SCROLLBAR_WIDTH};
use crate::state::LegendState;
use crate::text::{split_lines, strip_markup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelNode {
    pub rect: Rect,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryNode {
    /// Flat entry index, as used for hit-testing and clicks.
    pub index: usize,
    pub lines: Vec<String>,
    pub opacity: f64,
    pub color: String,
    /// Left edge and vertical centre, relative to the group.
    pub offset: Point,
    pub hit_region: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: String,
    pub offset: Point,
    pub entries: Vec<EntryNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollbarNode {
    pub rect: Rect,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub clip_id: String,
    /// Panel top-left corner on the canvas.
    pub origin: Point,
    pub panel: PanelNode,
    pub clip: Rect,
    pub content_offset: f64,
    pub groups: Vec<GroupNode>,
    pub scrollbar: Option<ScrollbarNode>,
    pub font: FontConfig,
}

impl Scene {
    pub fn entries(&self) -> impl Iterator<Item = &EntryNode> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// Canvas extent covered by the panel, scrollbar included.
    pub fn bounds(&self) -> Rect {
        let mut r = self.panel.rect.translated(self.origin);
        if let Some(sb) = &self.scrollbar {
            let right = self.origin.x + sb.rect.right();
            r.width = r.width.max(right - r.x);
        }
        r
    }
}

/// Build the scene for `state`. `uid` distinguishes the clip of several charts
/// on one page.
pub fn build_scene(state: &LegendState, uid: &str) -> Scene {
    let bw = state.border_width;
    let width = state.position.width;
    let visible = state.position.visible_height;

    let (panel_rect, clip, content_offset, scrollbar) = match &state.scroll {
        Some(scroll) => {
            let frame = scroll.frame();
            let rect = Rect::new(
                bw / 2.0,
                bw / 2.0,
                width - 2.0 * bw + SCROLLBAR_WIDTH + SCROLLBAR_MARGIN,
                visible - bw,
            );
            let sb = ScrollbarNode {
                rect: frame.scrollbar,
                color: SCROLLBAR_COLOR.to_string(),
            };
            (rect, frame.clip, frame.content_offset, Some(sb))
        }
        None => (
            Rect::new(bw / 2.0, bw / 2.0, width, (visible - bw).max(0.0)),
            Rect::new(bw, bw, width, (visible - 2.0 * bw).max(0.0)),
            0.0,
            None,
        ),
    };

    let mut index = 0;
    let groups = state
        .layout
        .groups
        .iter()
        .map(|g| GroupNode {
            id: g.id.clone(),
            offset: g.offset,
            entries: g
                .entries
                .iter()
                .map(|p| {
                    let node = EntryNode {
                        index,
                        lines: split_lines(&p.entry.label)
                            .into_iter()
                            .map(strip_markup)
                            .collect(),
                        opacity: p.entry.opacity(),
                        color: p.entry.color.clone(),
                        offset: p.offset,
                        hit_region: p.hit_region,
                    };
                    index += 1;
                    node
                })
                .collect(),
        })
        .collect();

    Scene {
        clip_id: format!("legend{uid}"),
        origin: Point::new(state.position.x, state.position.y),
        panel: PanelNode {
            rect: panel_rect,
            fill: state.bg_color.clone(),
            stroke: state.border_color.clone(),
            stroke_width: bw,
        },
        clip,
        content_offset,
        groups,
        scrollbar,
        font: state.font.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanvasBounds, ChartInput, Trace, TraceVisibility};
    use crate::source::extract_groups;
    use crate::state::compute_state;
    use crate::text::{HeuristicMeasurer, measure_entries};

    fn scene_for(input: &ChartInput) -> Scene {
        let mut groups = extract_groups(&input.traces, &input.hidden_labels, &input.legend);
        measure_entries(&mut groups, &input.legend.font, &HeuristicMeasurer);
        let state = compute_state(&groups, &input.legend, &input.canvas, input.static_export, 0.0);
        build_scene(&state, "7")
    }

    #[test]
    fn legend_only_entries_are_dimmed() {
        let input = ChartInput::new(
            vec![
                Trace::new("on"),
                Trace::new("off").with_visibility(TraceVisibility::LegendOnly),
            ],
            CanvasBounds::default(),
        );
        let scene = scene_for(&input);
        assert_eq!(scene.clip_id, "legend7");
        let op: Vec<f64> = scene.entries().map(|e| e.opacity).collect();
        assert_eq!(op, vec![1.0, 0.5]);
        assert!(scene.scrollbar.is_none());
    }

    #[test]
    fn tall_legend_gets_scrollbar_and_wider_background() {
        let traces = (0..60).map(|i| Trace::new(format!("series {i}"))).collect();
        let input = ChartInput::new(traces, CanvasBounds::default());
        let scene = scene_for(&input);
        let sb = scene.scrollbar.as_ref().expect("scrollbar");
        assert_eq!(sb.rect.y, SCROLLBAR_MARGIN);
        assert_eq!(scene.clip.y, 0.0);
    }

    #[test]
    fn br_labels_become_lines() {
        let input = ChartInput::new(vec![Trace::new("<b>a</b><br>b")], CanvasBounds::default());
        let scene = scene_for(&input);
        assert_eq!(scene.entries().next().unwrap().lines, vec!["a", "b"]);
    }
}
