use legend_rs::layout::{LayoutMode, layout};
use legend_rs::source::EntryKind;
use legend_rs::{LegendEntry, LegendGroup, LegendOptions, Orientation, TraceHandle};

fn entries(n: usize, w: f64, h: f64) -> LegendGroup {
    LegendGroup {
        id: String::new(),
        entries: (0..n)
            .map(|i| {
                let mut e = LegendEntry::new(
                    format!("e{i}"),
                    TraceHandle(i),
                    EntryKind::Trace,
                    "",
                    false,
                    "#4472C4",
                );
                e.width = w;
                e.height = h;
                e
            })
            .collect(),
    }
}

fn horizontal() -> LegendOptions {
    LegendOptions {
        orientation: Orientation::Horizontal,
        // falls back to the 5px slot gap
        group_gap: 0.0,
        ..Default::default()
    }
}

#[test]
fn third_slot_wraps_at_300px() {
    // 5px gap + 40px symbol + 105px label = 150px per slot
    let l = layout(&[entries(3, 105.0, 19.0)], &horizontal(), 300.0);
    assert_eq!(l.mode, LayoutMode::Rows);
    let xs: Vec<f64> = l.entries().map(|e| e.offset.x).collect();
    let ys: Vec<f64> = l.entries().map(|e| e.offset.y).collect();
    assert_eq!(xs, vec![0.0, 150.0, 0.0]);
    assert_eq!(ys, vec![14.5, 14.5, 33.5]);
    assert_eq!(l.width, 300.0);
    assert_eq!(l.height, 19.0 + 19.0 + 10.0);
}

#[test]
fn wide_canvas_keeps_one_row() {
    let l = layout(&[entries(3, 105.0, 19.0)], &horizontal(), 1000.0);
    assert!(l.entries().all(|e| e.offset.y == 14.5));
    assert_eq!(l.width, 450.0);
    assert_eq!(l.height, 29.0);
}

#[test]
fn slots_are_uniform_and_use_widest_label() {
    let mut g = entries(2, 10.0, 19.0);
    g.entries[1].width = 60.0;
    let opts = LegendOptions {
        group_gap: 20.0,
        ..horizontal()
    };
    let l = layout(&[g], &opts, 1000.0);
    let xs: Vec<f64> = l.entries().map(|e| e.offset.x).collect();
    assert_eq!(xs, vec![0.0, 120.0]);
}

#[test]
fn row_height_follows_tallest_entry() {
    let mut g = entries(3, 105.0, 19.0);
    g.entries[1].height = 40.0;
    let l = layout(&[g], &horizontal(), 300.0);
    let third = l.entries().nth(2).unwrap();
    assert_eq!(third.offset.y, 5.0 + 9.5 + 40.0);
    assert_eq!(l.height, 40.0 + 19.0 + 10.0);
}
