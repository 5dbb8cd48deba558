//! legend_rs
//!
//! Legend layout and interaction engine for charts. Given a chart's traces,
//! legend options and canvas bounds, it extracts legend entries, measures and
//! lays them out, anchors the panel on the canvas, negotiates margin space
//! with the chart, scrolls panels that do not fit and turns clicks into
//! visibility changes. Pairs with the `legend` CLI.
//!
//! ### Features
//! - Vertical, horizontal (row-wrapped) and grouped layouts
//! - Anchoring with clamping to the canvas; scrolling for tall legends
//! - Click-to-toggle for whole traces, legend groups and pie categories
//! - A typed scene tree painted with plotters (SVG, PNG, JPEG)
//!
//! ### Example
//! ```no_run
//! use legend_rs::{CanvasBounds, ChartInput, HeuristicMeasurer, LegendController, MarginBook, Trace};
//!
//! let chart = ChartInput::new(
//!     vec![Trace::new("GDP"), Trace::new("Population")],
//!     CanvasBounds::default(),
//! );
//! let mut legend = LegendController::new("1");
//! let mut margins = MarginBook::new();
//! legend.redraw(&chart, &HeuristicMeasurer, &mut margins)?;
//! if let Some(scene) = legend.scene() {
//!     legend_rs::export::export_scene(&scene, "legend.svg", &Default::default())?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod anchor;
pub mod controller;
pub mod error;
pub mod export;
pub mod geom;
pub mod layout;
pub mod margin;
pub mod models;
pub mod options;
pub mod palette;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod source;
pub mod state;
pub mod storage;
pub mod text;
pub mod toggle;

pub use controller::{LegendController, PendingPass};
pub use error::LegendError;
pub use margin::{MarginAllocator, MarginBook, MarginReservation};
pub use models::{CanvasBounds, ChartInput, Trace, TraceHandle, TraceKind, TraceVisibility};
pub use options::{FontConfig, GroupArrangement, LegendOptions, Orientation, XAnchor, YAnchor};
pub use scene::Scene;
pub use source::{LegendEntry, LegendGroup, extract_groups};
pub use state::LegendState;
pub use text::{HeuristicMeasurer, TextMeasurer, TextSize};
pub use toggle::{VisibilityChange, VisibilityOwner};
