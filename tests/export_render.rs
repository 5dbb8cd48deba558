use std::fs;

use legend_rs::export::{ExportOptions, ImageFormat, export_scene, render_svg, svg_data_url};
use legend_rs::{
    CanvasBounds, ChartInput, HeuristicMeasurer, LegendController, MarginBook, Scene, Trace,
};
use tempfile::tempdir;

fn scene(n: usize) -> Scene {
    let traces = (0..n).map(|i| Trace::new(format!("series {i}"))).collect();
    let chart = ChartInput::new(traces, CanvasBounds::default());
    let mut ctl = LegendController::new("x");
    let mut book = MarginBook::new();
    ctl.redraw(&chart, &HeuristicMeasurer, &mut book).unwrap();
    ctl.scene().unwrap()
}

fn opts(pixel_ratio: f64) -> ExportOptions {
    ExportOptions {
        width: Some(700.0),
        height: Some(450.0),
        pixel_ratio,
    }
}

#[test]
fn svg_export_writes_a_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legend.svg");
    export_scene(&scene(3), &path, &opts(1.0)).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<rect"));
}

#[test]
fn png_export_honours_pixel_ratio() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legend.png");
    export_scene(&scene(3), &path, &opts(2.0)).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!((width, height), (1400, 900));
}

#[test]
fn scrolling_legend_renders_its_scrollbar() {
    let s = scene(60);
    assert!(s.scrollbar.is_some());
    let svg = render_svg(&s, &opts(1.0)).unwrap();
    // background, scrollbar and at least one marker
    assert!(svg.matches("<rect").count() >= 3);
}

#[test]
fn unsupported_format_is_rejected() {
    let dir = tempdir().unwrap();
    let err = export_scene(&scene(1), dir.path().join("legend.webp"), &opts(1.0)).unwrap_err();
    assert!(err.to_string().contains("Image format is not jpeg, png or svg"));
    assert!("gif".parse::<ImageFormat>().is_err());
}

#[test]
fn non_pixel_sizes_are_rejected() {
    let dir = tempdir().unwrap();
    let bad = ExportOptions {
        width: Some(0.5),
        ..opts(1.0)
    };
    let err = export_scene(&scene(1), dir.path().join("legend.svg"), &bad).unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Height and width should be pixel values.")
    );
    assert!(!dir.path().join("legend.svg").exists());
}

#[test]
fn data_url_wraps_rendered_svg() {
    let svg = render_svg(&scene(2), &opts(1.0)).unwrap();
    let url = svg_data_url(&svg);
    assert!(url.starts_with("data:image/svg+xml,%3C"));
    assert!(!url.contains(' '));
}
