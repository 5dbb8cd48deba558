use legend_rs::scroll::{SCROLLBAR_MARGIN, ScrollController};

fn controller() -> ScrollController {
    // 300px of content in a 100px viewport, 2px border
    ScrollController::new(300.0, 100.0, 80.0, 2.0, 0.0).unwrap()
}

#[test]
fn extreme_wheel_deltas_stay_in_range() {
    let mut c = controller();
    c.wheel(1e9);
    assert_eq!(c.offset(), -200.0);
    c.wheel(-1e9);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn any_delta_sequence_stays_in_range() {
    let mut c = controller();
    for d in [5.0, -3.0, 1e9, -7.0, 2e3, -1e12, f64::NAN, f64::INFINITY, 0.25, 13.0] {
        let frame = c.wheel(d);
        assert!((-200.0..=0.0).contains(&c.offset()), "offset {}", c.offset());
        assert_eq!(frame.content_offset, c.offset());
        assert_eq!(frame.clip.y, 2.0 - c.offset());
    }
}

#[test]
fn drag_maps_thumb_back_to_offset() {
    let mut c = controller();
    // track = 100 - 20 - 2 * 4 = 72; thumb top 40 is halfway along it
    c.drag_to(50.0);
    assert_eq!(c.offset(), -100.0);
    assert_eq!(c.frame().scrollbar.y, 40.0);

    c.drag_to(1e6);
    assert_eq!(c.offset(), -200.0);
    c.drag_to(-1e6);
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.frame().scrollbar.y, SCROLLBAR_MARGIN);
}

#[test]
fn wheel_moves_content_proportionally() {
    let mut c = controller();
    // 36px of wheel = half the track = half the scrollable height
    c.wheel(36.0);
    assert_eq!(c.offset(), -100.0);
}

#[test]
fn initial_offset_is_clamped() {
    let c = ScrollController::new(300.0, 100.0, 80.0, 0.0, -5000.0).unwrap();
    assert_eq!(c.offset(), -200.0);
    let c = ScrollController::new(300.0, 100.0, 80.0, 0.0, 42.0).unwrap();
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn tiny_viewport_keeps_a_positive_track() {
    let mut c = ScrollController::new(300.0, 10.0, 80.0, 0.0, 0.0).unwrap();
    assert_eq!(c.track_length(), 1.0);
    c.wheel(0.5);
    assert!((-290.0..=0.0).contains(&c.offset()));
}
