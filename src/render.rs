//! Paint a legend [`Scene`] with plotters.
//!
//! Works with any `DrawingBackend`; [`crate::export`] picks SVG or bitmap.
//! Coordinates are multiplied by `scale` so bitmap output can be rendered at a
//! higher pixel ratio.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::LegendError;
use crate::geom::Rect;
use crate::layout::TEXT_OFFSET;
use crate::options::FontConfig;
use crate::palette::{color_or, parse_hex_color};
use crate::scene::{EntryNode, Scene};
use crate::text::{
    HeuristicMeasurer, LINE_HEIGHT_RATIO, TextMeasurer, TextSize, split_lines, strip_markup,
};

/// Environment variable naming a TTF/OTF file to use for labels.
pub const FONT_ENV: &str = "LEGEND_FONT";

const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Marker swatch inside the symbol column.
const MARKER_X0: f64 = 8.0;
const MARKER_X1: f64 = 32.0;
const MARKER_HALF_HEIGHT: f64 = 5.0;

static FONT_READY: OnceLock<bool> = OnceLock::new();

fn font_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(p) = std::env::var_os(FONT_ENV) {
        out.push(PathBuf::from(p));
    }
    out.extend(FALLBACK_FONT_PATHS.iter().map(PathBuf::from));
    out
}

/// One-time registration of a "sans-serif" font for the `ab_glyph` text path,
/// which does not discover OS fonts on its own. Returns whether a font is
/// available.
pub fn ensure_fonts_registered() -> bool {
    *FONT_READY.get_or_init(|| {
        for path in font_candidates() {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // ab_glyph keeps a reference for the life of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font(
                "sans-serif",
                plotters::style::FontStyle::Normal,
                bytes,
            ) {
                Ok(()) => {
                    debug!("legend font registered from {}", path.display());
                    return true;
                }
                Err(_) => warn!("unusable font {}", path.display()),
            }
        }
        warn!("no font found (set {FONT_ENV}); legend labels may be skipped");
        false
    })
}

/// Measures labels with the registered font's glyph metrics, or heuristically
/// when no font could be registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMeasurer;

impl TextMeasurer for FontMeasurer {
    fn measure(&self, label: &str, font: &FontConfig) -> Result<TextSize, LegendError> {
        if !ensure_fonts_registered() {
            return HeuristicMeasurer.measure(label, font);
        }
        let desc = FontDesc::new(FontFamily::SansSerif, font.size_px, FontStyle::Normal);
        let lines = split_lines(label);
        let mut width = 0.0_f64;
        for line in &lines {
            let (w, _) = desc
                .box_size(&strip_markup(line))
                .map_err(|e| LegendError::Measurement {
                    label: label.to_string(),
                    reason: format!("{e:?}"),
                })?;
            width = width.max(f64::from(w));
        }
        let height = lines.len().max(1) as f64 * font.size_px * LINE_HEIGHT_RATIO;
        Ok(TextSize::new(width, height))
    }
}

fn px(v: f64, scale: f64) -> i32 {
    (v * scale).round() as i32
}

fn corners(r: Rect, scale: f64) -> [(i32, i32); 2] {
    [
        (px(r.x, scale), px(r.y, scale)),
        (px(r.right(), scale), px(r.bottom(), scale)),
    ]
}

/// Paint `scene` onto `area`. The area's origin is the canvas origin.
pub fn paint_scene<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    scale: f64,
) -> Result<()> {
    ensure_fonts_registered();

    let panel = scene.panel.rect.translated(scene.origin);
    let fill = color_or(&scene.panel.fill, WHITE);
    area.draw(&Rectangle::new(corners(panel, scale), fill.filled()))
        .map_err(|e| anyhow!("{:?}", e))?;
    if scene.panel.stroke_width > 0.0 {
        let stroke = color_or(&scene.panel.stroke, BLACK);
        let width = (scene.panel.stroke_width * scale).round().max(1.0) as u32;
        area.draw(&Rectangle::new(
            corners(panel, scale),
            stroke.stroke_width(width),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    // Content layer: a sub-area restricted to the clip rectangle. A content
    // point (cx, cy) lands at (cx - clip.x, cy - clip.y) inside it.
    let clip = scene.clip;
    let clip_on_canvas = Rect::new(
        scene.origin.x + clip.x,
        scene.origin.y + clip.y + scene.content_offset,
        clip.width,
        clip.height,
    );
    if clip.width > 0.0 && clip.height > 0.0 {
        let content = area.clone().shrink(
            (px(clip_on_canvas.x, scale), px(clip_on_canvas.y, scale)),
            (
                (clip.width * scale).round().max(1.0) as u32,
                (clip.height * scale).round().max(1.0) as u32,
            ),
        );
        let mut labels_ok = true;
        for group in &scene.groups {
            for entry in &group.entries {
                let x = group.offset.x + entry.offset.x - clip.x;
                let y = group.offset.y + entry.offset.y - clip.y;
                paint_entry(&content, scene, entry, x, y, scale, &mut labels_ok)?;
            }
        }
    }

    if let Some(sb) = &scene.scrollbar {
        let color = color_or(&sb.color, BLACK);
        area.draw(&Rectangle::new(
            corners(sb.rect.translated(scene.origin), scale),
            color.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn paint_entry<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    entry: &EntryNode,
    x: f64,
    y: f64,
    scale: f64,
    labels_ok: &mut bool,
) -> Result<()> {
    let marker = parse_hex_color(&entry.color)
        .unwrap_or(RGBColor(68, 114, 196))
        .mix(entry.opacity);
    area.draw(&Rectangle::new(
        [
            (px(x + MARKER_X0, scale), px(y - MARKER_HALF_HEIGHT, scale)),
            (px(x + MARKER_X1, scale), px(y + MARKER_HALF_HEIGHT, scale)),
        ],
        marker.filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    if !*labels_ok {
        return Ok(());
    }
    let font_px = scene.font.size_px * scale;
    let line_h = scene.font.size_px * LINE_HEIGHT_RATIO;
    let text_color = color_or(&scene.font.color, BLACK).mix(entry.opacity);
    let style = TextStyle::from((FontFamily::SansSerif, font_px))
        .color(&text_color)
        .pos(Pos::new(HPos::Left, VPos::Center));

    // lines are stacked around the entry's vertical centre
    let first = y - line_h * (entry.lines.len().saturating_sub(1)) as f64 / 2.0;
    for (i, line) in entry.lines.iter().enumerate() {
        let ly = first + i as f64 * line_h;
        if let Err(e) = area.draw(&Text::new(
            line.as_str(),
            (px(x + TEXT_OFFSET, scale), px(ly, scale)),
            style.clone(),
        )) {
            warn!("skipping legend labels: {:?}", e);
            *labels_ok = false;
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_rounding_applies_scale() {
        assert_eq!(px(10.4, 1.0), 10);
        assert_eq!(px(10.4, 2.0), 21);
        assert_eq!(corners(Rect::new(1.0, 2.0, 3.0, 4.0), 2.0), [(2, 4), (8, 12)]);
    }

    #[test]
    fn font_measurer_sizes_multi_line_labels() {
        let font = FontConfig::default();
        let one = FontMeasurer.measure("series", &font).unwrap();
        let two = FontMeasurer.measure("series<br>x", &font).unwrap();
        assert!(one.width > 0.0);
        assert_eq!(two.width, one.width);
        assert!((two.height - 2.0 * one.height).abs() < 1e-9);
    }
}
