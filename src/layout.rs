//! Legend layout engine.
//!
//! A pure function of the measured entries and the options: given the same
//! input it always produces the same [`LegendLayout`]. Three strategies exist,
//! selected from `(orientation, grouped)`:
//!
//! - **stack**: entries top-to-bottom (vertical legends; grouped vertical
//!   legends with [`GroupArrangement::Stacked`] insert `group_gap` between groups)
//! - **columns**: one column per group, side by side (grouped legends)
//! - **rows**: uniform slots left-to-right, greedily wrapped into rows when the
//!   next slot would overflow the available width (horizontal, ungrouped)
//!
//! Offsets are relative: groups are placed inside the panel, entries inside
//! their group. The `y` of an entry is the vertical centre of its row.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::options::{GroupArrangement, LegendOptions, Orientation};
use crate::source::{LegendEntry, LegendGroup};

/// Horizontal room reserved left of a label for the trace symbol.
pub const TEXT_OFFSET: f64 = 40.0;
/// Extra width of a vertical legend beyond its widest label.
pub const VERTICAL_WIDTH_PAD: f64 = 45.0;
/// Space above the first row.
pub const TOP_PAD: f64 = 5.0;
/// Total vertical padding (top and bottom) inside the border.
pub const VERTICAL_PAD: f64 = 10.0;
/// Slot gap for horizontal legends whose `group_gap` is zero.
pub const DEFAULT_SLOT_GAP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Stack,
    StackedGroups,
    Columns,
    Rows,
}

impl LayoutMode {
    pub fn select(options: &LegendOptions) -> Self {
        match (options.orientation, options.grouped) {
            (Orientation::Vertical, false) => LayoutMode::Stack,
            (Orientation::Vertical, true) => match options.arrangement {
                GroupArrangement::Columns => LayoutMode::Columns,
                GroupArrangement::Stacked => LayoutMode::StackedGroups,
            },
            (Orientation::Horizontal, true) => LayoutMode::Columns,
            (Orientation::Horizontal, false) => LayoutMode::Rows,
        }
    }
}

/// An entry with its position inside the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPlacement {
    pub entry: LegendEntry,
    /// Left edge and vertical centre of the entry, relative to its group.
    pub offset: Point,
    /// Invisible click target, relative to `offset`.
    pub hit_region: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPlacement {
    pub id: String,
    /// Relative to the panel's top-left corner.
    pub offset: Point,
    pub entries: Vec<EntryPlacement>,
}

/// Result of one layout pass, before anchoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub mode: LayoutMode,
    /// Whole pixels.
    pub width: f64,
    /// Whole pixels, rounded up so the last row is never clipped.
    pub height: f64,
    pub groups: Vec<GroupPlacement>,
}

impl LegendLayout {
    pub fn entries(&self) -> impl Iterator<Item = &EntryPlacement> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Panel-relative position of an entry (left edge, vertical centre).
    pub fn entry_origin(&self, group: usize, entry: usize) -> Option<Point> {
        let g = self.groups.get(group)?;
        let e = g.entries.get(entry)?;
        Some(g.offset.offset(e.offset))
    }
}

/// Lay out measured groups. `available_width` only matters for row wrapping.
pub fn layout(groups: &[LegendGroup], options: &LegendOptions, available_width: f64) -> LegendLayout {
    let mode = LayoutMode::select(options);
    let out = match mode {
        LayoutMode::Stack => layout_stack(groups, options.border_width, 0.0, mode),
        LayoutMode::StackedGroups => {
            layout_stack(groups, options.border_width, options.group_gap, mode)
        }
        LayoutMode::Columns => layout_columns(groups, options.border_width, options.group_gap),
        LayoutMode::Rows => layout_rows(groups, options, available_width),
    };
    debug!(
        "legend layout {:?}: {} entries in {} groups -> {}x{}",
        mode,
        out.entry_count(),
        out.groups.len(),
        out.width,
        out.height
    );
    out
}

fn layout_stack(groups: &[LegendGroup], bw: f64, group_gap: f64, mode: LayoutMode) -> LegendLayout {
    let mut height = 0.0_f64;
    let mut width = 0.0_f64;
    let mut placed: Vec<GroupPlacement> = Vec::with_capacity(groups.len());

    for (i, group) in groups.iter().enumerate() {
        let mut entries = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            let offset = Point::new(bw, TOP_PAD + bw + height + entry.height / 2.0);
            height += entry.height;
            width = width.max(entry.width);
            entries.push(EntryPlacement {
                entry: entry.clone(),
                offset,
                hit_region: Rect::default(),
            });
        }
        placed.push(GroupPlacement {
            id: group.id.clone(),
            offset: Point::new(0.0, i as f64 * group_gap),
            entries,
        });
    }

    width += VERTICAL_WIDTH_PAD + bw * 2.0;
    height += VERTICAL_PAD + bw * 2.0;
    if !groups.is_empty() {
        height += (groups.len() - 1) as f64 * group_gap;
    }

    let width = width.round();
    let height = height.ceil();
    assign_hit_regions(&mut placed, width + TEXT_OFFSET);

    LegendLayout {
        mode,
        width,
        height,
        groups: placed,
    }
}

fn layout_columns(groups: &[LegendGroup], bw: f64, group_gap: f64) -> LegendLayout {
    let mut width = 0.0_f64;
    let mut height = 0.0_f64;
    let mut placed: Vec<GroupPlacement> = Vec::with_capacity(groups.len());

    for group in groups {
        let x = width;
        let label_w = group.entries.iter().map(|e| e.width).fold(0.0, f64::max);
        let column_w = group_gap + TEXT_OFFSET + label_w;
        width += column_w;

        let mut group_height = 0.0;
        let mut entries = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            entries.push(EntryPlacement {
                entry: entry.clone(),
                offset: Point::new(0.0, TOP_PAD + bw + group_height + entry.height / 2.0),
                hit_region: row_region(column_w, entry.height),
            });
            group_height += entry.height;
        }
        height = height.max(group_height);

        placed.push(GroupPlacement {
            id: group.id.clone(),
            offset: Point::new(x, 0.0),
            entries,
        });
    }

    height += VERTICAL_PAD + bw * 2.0;
    width += bw * 2.0;

    let width = width.round();
    let height = height.ceil();

    LegendLayout {
        mode: LayoutMode::Columns,
        width,
        height,
        groups: placed,
    }
}

/// Greedy row packing. Not globally optimal: an entry goes on the current row
/// unless its slot would end strictly past `available_width`.
fn layout_rows(groups: &[LegendGroup], options: &LegendOptions, available_width: f64) -> LegendLayout {
    let bw = options.border_width;
    let gap = if options.group_gap > 0.0 {
        options.group_gap
    } else {
        DEFAULT_SLOT_GAP
    };
    let slot_width = groups
        .iter()
        .flat_map(|g| g.entries.iter())
        .map(|e| TEXT_OFFSET + e.width)
        .fold(0.0, f64::max);

    let mut offset_x = 0.0_f64;
    let mut row_top = 0.0_f64;
    let mut row_height = 0.0_f64;
    let mut widest_row = 0.0_f64;
    let mut placed: Vec<GroupPlacement> = Vec::with_capacity(groups.len());

    for group in groups {
        let mut entries = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            if bw + offset_x + gap + slot_width > available_width {
                offset_x = 0.0;
                row_top += row_height;
                row_height = 0.0;
            }
            entries.push(EntryPlacement {
                entry: entry.clone(),
                offset: Point::new(bw + offset_x, TOP_PAD + bw + entry.height / 2.0 + row_top),
                hit_region: row_region(gap + slot_width, entry.height),
            });
            offset_x += gap + slot_width;
            widest_row = widest_row.max(offset_x);
            row_height = row_height.max(entry.height);
        }
        placed.push(GroupPlacement {
            id: group.id.clone(),
            offset: Point::ORIGIN,
            entries,
        });
    }

    let width = (widest_row + bw * 2.0).round();
    let height = (row_top + row_height + VERTICAL_PAD + bw * 2.0).ceil();

    LegendLayout {
        mode: LayoutMode::Rows,
        width,
        height,
        groups: placed,
    }
}

/// Click target of `width` centred on the entry's row.
fn row_region(width: f64, height: f64) -> Rect {
    Rect::new(0.0, -height / 2.0, width, height)
}

fn assign_hit_regions(groups: &mut [GroupPlacement], width: f64) {
    for e in groups.iter_mut().flat_map(|g| g.entries.iter_mut()) {
        e.hit_region = row_region(width, e.entry.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TraceHandle;
    use crate::source::EntryKind;

    fn entry(label: &str, w: f64, h: f64) -> LegendEntry {
        LegendEntry {
            label: label.to_string(),
            owner: TraceHandle(0),
            kind: EntryKind::Trace,
            legend_group: String::new(),
            is_hidden: false,
            color: "#4472C4".to_string(),
            width: w,
            height: h,
        }
    }

    #[test]
    fn entries_are_centred_in_their_rows() {
        let g = LegendGroup {
            id: String::new(),
            entries: vec![entry("a", 10.0, 20.0), entry("b", 10.0, 30.0)],
        };
        let l = layout(&[g], &LegendOptions::default(), 500.0);
        let ys: Vec<f64> = l.entries().map(|e| e.offset.y).collect();
        assert_eq!(ys, vec![15.0, 40.0]);
    }

    #[test]
    fn mode_selection_covers_all_combinations() {
        let mut o = LegendOptions::default();
        assert_eq!(LayoutMode::select(&o), LayoutMode::Stack);
        o.grouped = true;
        assert_eq!(LayoutMode::select(&o), LayoutMode::Columns);
        o.arrangement = GroupArrangement::Stacked;
        assert_eq!(LayoutMode::select(&o), LayoutMode::StackedGroups);
        o.orientation = Orientation::Horizontal;
        assert_eq!(LayoutMode::select(&o), LayoutMode::Columns);
        o.grouped = false;
        assert_eq!(LayoutMode::select(&o), LayoutMode::Rows);
    }
}
