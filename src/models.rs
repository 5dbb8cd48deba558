use serde::{Deserialize, Serialize};

use crate::options::LegendOptions;

/// Non-owning reference to a trace: its declaration index in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceHandle(pub usize);

/// Kind of trace, as far as the legend cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    #[default]
    Scatter,
    Bar,
    Area,
    /// Aggregate-category trace: one legend entry per category label.
    Pie,
}

impl TraceKind {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, TraceKind::Pie)
    }
}

/// Trace visibility as set by the visibility owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceVisibility {
    #[default]
    Visible,
    /// Hidden from the plot, shown dimmed in the legend.
    #[serde(rename = "legendonly")]
    LegendOnly,
    /// Not drawn anywhere, including the legend.
    Hidden,
}

impl TraceVisibility {
    /// `Visible <-> LegendOnly`; a fully hidden trace becomes visible.
    pub fn toggled(self) -> Self {
        match self {
            TraceVisibility::Visible => TraceVisibility::LegendOnly,
            TraceVisibility::LegendOnly | TraceVisibility::Hidden => TraceVisibility::Visible,
        }
    }
}

/// Chart descriptions encode visibility either as a boolean or as the string
/// `"legendonly"`. Accept both.
impl<'de> Deserialize<'de> for TraceVisibility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct VisibilityVisitor;

        impl Visitor<'_> for VisibilityVisitor {
            type Value = TraceVisibility;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a boolean or one of \"visible\", \"legendonly\", \"hidden\"")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if v {
                    TraceVisibility::Visible
                } else {
                    TraceVisibility::Hidden
                })
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match s.to_ascii_lowercase().as_str() {
                    "visible" | "true" => Ok(TraceVisibility::Visible),
                    "legendonly" => Ok(TraceVisibility::LegendOnly),
                    "hidden" | "false" => Ok(TraceVisibility::Hidden),
                    other => Err(E::custom(format!("unknown visibility {other:?}"))),
                }
            }
        }

        deserializer.deserialize_any(VisibilityVisitor)
    }
}

fn default_true() -> bool {
    true
}

/// One trace of the chart, reduced to the fields the legend reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: TraceKind,
    #[serde(default)]
    pub visible: TraceVisibility,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    /// Empty string means "no group".
    #[serde(default)]
    pub legend_group: String,
    /// Category labels of aggregate traces; ignored otherwise.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Marker colour (CSS hex); the default palette is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Trace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TraceKind::Scatter,
            visible: TraceVisibility::Visible,
            show_legend: true,
            legend_group: String::new(),
            labels: Vec::new(),
            color: None,
        }
    }

    pub fn pie(name: impl Into<String>, labels: &[&str]) -> Self {
        Self {
            kind: TraceKind::Pie,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            ..Self::new(name)
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.legend_group = group.into();
        self
    }

    pub fn with_visibility(mut self, visible: TraceVisibility) -> Self {
        self.visible = visible;
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }
}

/// Canvas geometry supplied by the chart's margin/axis layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    /// Plot-area width (canvas width minus left/right margins).
    pub available_width: f64,
    /// Plot-area height (canvas height minus top/bottom margins).
    pub available_height: f64,
}

impl CanvasBounds {
    /// Canvas with symmetric margins around the plot area.
    pub fn with_margins(width: f64, height: f64, margin_x: f64, margin_y: f64) -> Self {
        Self {
            width,
            height,
            margin_left: margin_x,
            margin_top: margin_y,
            available_width: (width - 2.0 * margin_x).max(0.0),
            available_height: (height - 2.0 * margin_y).max(0.0),
        }
    }

    /// Canvas whose plot area is inset by `(left, top, right, bottom)`.
    pub fn with_plot_margins(
        width: f64,
        height: f64,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    ) -> Self {
        Self {
            width,
            height,
            margin_left: left,
            margin_top: top,
            available_width: (width - left - right).max(0.0),
            available_height: (height - top - bottom).max(0.0),
        }
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self::with_plot_margins(700.0, 450.0, 80.0, 100.0, 80.0, 80.0)
    }
}

/// Everything the legend consumes from the chart engine for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    #[serde(default)]
    pub traces: Vec<Trace>,
    /// Hidden category labels of aggregate traces, in the order they were hidden.
    #[serde(default)]
    pub hidden_labels: Vec<String>,
    #[serde(default)]
    pub canvas: CanvasBounds,
    #[serde(default)]
    pub legend: LegendOptions,
    /// Static renders (image export) never scroll.
    #[serde(default)]
    pub static_export: bool,
}

impl ChartInput {
    pub fn new(traces: Vec<Trace>, canvas: CanvasBounds) -> Self {
        Self {
            traces,
            hidden_labels: Vec::new(),
            canvas,
            legend: LegendOptions::default(),
            static_export: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_accepts_bool_and_string() {
        let t: Trace = serde_json::from_str(r#"{"name":"a","visible":"legendonly"}"#).unwrap();
        assert_eq!(t.visible, TraceVisibility::LegendOnly);
        let t: Trace = serde_json::from_str(r#"{"name":"a","visible":false}"#).unwrap();
        assert_eq!(t.visible, TraceVisibility::Hidden);
        let t: Trace = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(t.visible, TraceVisibility::Visible);
        assert!(t.show_legend);
    }

    #[test]
    fn visibility_serializes_as_legendonly() {
        let s = serde_json::to_string(&TraceVisibility::LegendOnly).unwrap();
        assert_eq!(s, "\"legendonly\"");
    }

    #[test]
    fn toggled_flips_between_visible_and_legendonly() {
        assert_eq!(TraceVisibility::Visible.toggled(), TraceVisibility::LegendOnly);
        assert_eq!(TraceVisibility::LegendOnly.toggled(), TraceVisibility::Visible);
    }
}
