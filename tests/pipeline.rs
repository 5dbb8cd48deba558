use legend_rs::margin::LEGEND_MARGIN_KEY;
use legend_rs::{
    CanvasBounds, ChartInput, FontConfig, HeuristicMeasurer, LegendController, LegendError,
    MarginBook, TextSize, Trace,
};

fn chart(n: usize) -> ChartInput {
    let traces = (0..n).map(|i| Trace::new(format!("series {i}"))).collect();
    ChartInput::new(traces, CanvasBounds::default())
}

#[test]
fn superseded_pass_is_discarded() {
    let input = chart(3);
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();

    let first = ctl.begin_pass(&input).unwrap();
    let second = ctl.begin_pass(&input).unwrap();
    let err = ctl
        .complete_pass(first, &HeuristicMeasurer, &mut book)
        .unwrap_err();
    assert!(matches!(err, LegendError::StalePass { pass: 1, current: 2 }));
    assert!(book.is_empty());

    ctl.complete_pass(second, &HeuristicMeasurer, &mut book)
        .unwrap();
    assert!(book.get(LEGEND_MARGIN_KEY).is_some());
    assert!(!ctl.is_pass_in_flight());
}

#[test]
fn redraw_is_deterministic() {
    let input = chart(5);
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    let a = ctl
        .redraw(&input, &HeuristicMeasurer, &mut book)
        .unwrap()
        .cloned();
    let b = ctl
        .redraw(&input, &HeuristicMeasurer, &mut book)
        .unwrap()
        .cloned();
    assert_eq!(a, b);
}

#[test]
fn real_measurements_replace_the_approximation() {
    let input = chart(2);
    let fixed = |_: &str, _: &FontConfig| -> Result<TextSize, LegendError> {
        Ok(TextSize::new(100.0, 12.0))
    };
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();

    let pending = ctl.begin_pass(&input).unwrap();
    let rough = pending.approximate().unwrap().computed_width;
    let state = ctl.complete_pass(pending, &fixed, &mut book).unwrap().unwrap();
    assert_eq!(state.computed_width, 145.0);
    assert_ne!(rough, state.computed_width);
    assert_eq!(state.computed_height, 2.0 * 19.0 + 10.0);
}

#[test]
fn failed_measurement_falls_back_without_aborting() {
    let input = chart(2);
    let flaky = |label: &str, _: &FontConfig| -> Result<TextSize, LegendError> {
        if label.ends_with('1') {
            Err(LegendError::Measurement {
                label: label.to_string(),
                reason: "font service unavailable".into(),
            })
        } else {
            Ok(TextSize::new(60.0, 30.0))
        }
    };
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    let state = ctl.redraw(&input, &flaky, &mut book).unwrap().unwrap();
    let sizes: Vec<(f64, f64)> = state
        .layout
        .entries()
        .map(|e| (e.entry.width, e.entry.height))
        .collect();
    assert_eq!(sizes, vec![(60.0, 33.0), (0.0, 19.0)]);
}

#[test]
fn empty_or_disabled_legend_releases_its_margin() {
    let mut input = chart(2);
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert_eq!(book.len(), 1);

    input.legend.show = false;
    let state = ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert!(state.is_none());
    assert!(book.is_empty());
    assert!(ctl.scene().is_none());

    input.legend.show = true;
    input.traces.clear();
    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert!(book.is_empty());
}

#[test]
fn scroll_position_survives_a_redraw() {
    let input = chart(60);
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert!(ctl.wheel(40.0));
    let before = ctl.state().unwrap().scroll_offset;
    assert!(before < 0.0);

    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert_eq!(ctl.state().unwrap().scroll_offset, before);
}

#[test]
fn tall_legend_reserves_horizontal_margin_only() {
    let input = chart(60);
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    let r = book.get(LEGEND_MARGIN_KEY).unwrap();
    assert_eq!((r.y, r.t, r.b), (0.5, 0.0, 0.0));
    assert!(r.r > 0.0);
}

#[test]
fn invalid_options_are_rejected_before_a_pass_starts() {
    let mut input = chart(1);
    input.legend.border_width = -1.0;
    let mut ctl = LegendController::new("p");
    let err = ctl.begin_pass(&input).unwrap_err();
    assert!(matches!(err, LegendError::InvalidOption { field: "border_width", .. }));
    assert_eq!(ctl.generation(), 0);
}

#[test]
fn static_export_freezes_scrolling() {
    let mut input = chart(60);
    input.static_export = true;
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();
    assert!(!ctl.wheel(100.0));
    assert!(ctl.scene().unwrap().scrollbar.is_none());
}

#[test]
fn wide_and_tall_panel_scrolls_inside_the_canvas() {
    let traces = (0..60)
        .map(|i| Trace::new(format!("{} {i}", "long label text ".repeat(4))))
        .collect();
    let input = ChartInput::new(traces, CanvasBounds::with_margins(400.0, 300.0, 50.0, 50.0));
    let mut ctl = LegendController::new("p");
    let mut book = MarginBook::new();
    let state = ctl
        .redraw(&input, &HeuristicMeasurer, &mut book)
        .unwrap()
        .unwrap()
        .clone();
    assert!(state.computed_width > 300.0);
    assert!(state.is_scrollable());
    assert_eq!((state.position.x, state.position.width), (50.0, 300.0));

    let scene = ctl.scene().unwrap();
    let clip_right = scene.origin.x + scene.clip.right();
    let bar_right = scene.origin.x + scene.scrollbar.as_ref().unwrap().rect.right();
    assert!(clip_right <= 400.0, "clip ends at {clip_right}");
    assert!(bar_right <= 400.0, "scrollbar ends at {bar_right}");
    assert!(scene.bounds().right() <= 400.0);
}
