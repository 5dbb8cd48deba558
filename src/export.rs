//! Image export: size validation, format selection, SVG/bitmap output and SVG
//! data URLs.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use serde::{Deserialize, Serialize};

use crate::error::LegendError;
use crate::render::paint_scene;
use crate::scene::Scene;

/// Canvas size used when the caller gives none.
pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// Characters left alone by `encodeURIComponent`-style escaping.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl ImageFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Result<Self, LegendError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        ext.parse()
    }

    pub fn is_vector(self) -> bool {
        matches!(self, ImageFormat::Svg)
    }
}

impl FromStr for ImageFormat {
    type Err = LegendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(LegendError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
        })
    }
}

/// `None` is accepted (use the default); otherwise the size must be a finite
/// number of pixels greater than one.
pub fn validate_size(size: Option<f64>) -> Result<(), LegendError> {
    match size {
        None => Ok(()),
        Some(v) if v.is_finite() && v > 1.0 => Ok(()),
        Some(v) => Err(LegendError::InvalidSize(v)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Bitmap upscaling factor (device pixel ratio). Ignored for SVG.
    pub pixel_ratio: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            pixel_ratio: 1.0,
        }
    }
}

impl ExportOptions {
    fn logical_size(&self) -> Result<(f64, f64), LegendError> {
        validate_size(self.width)?;
        validate_size(self.height)?;
        Ok((
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        ))
    }

    fn ratio(&self) -> f64 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }
}

/// Write `scene` to `path`; the format follows the extension (`.svg`,
/// `.png`, `.jpg`/`.jpeg`).
pub fn export_scene<P: AsRef<Path>>(scene: &Scene, path: P, opts: &ExportOptions) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    let (w, h) = opts.logical_size()?;

    if format.is_vector() {
        let root = SVGBackend::new(path, (w.round() as u32, h.round() as u32)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        paint_scene(&root, scene, 1.0)?;
    } else {
        let ratio = opts.ratio();
        let size = ((w * ratio).round() as u32, (h * ratio).round() as u32);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        paint_scene(&root, scene, ratio)?;
    }
    debug!("legend exported as {format} to {}", path.display());
    Ok(())
}

/// Render `scene` to an SVG document in memory.
pub fn render_svg(scene: &Scene, opts: &ExportOptions) -> Result<String> {
    let (w, h) = opts.logical_size()?;
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (w.round() as u32, h.round() as u32))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        paint_scene(&root, scene, 1.0)?;
    }
    Ok(out)
}

/// `data:` URL embedding an SVG document.
pub fn svg_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml,{}",
        percent_encoding::utf8_percent_encode(svg, URI_COMPONENT)
    )
}
