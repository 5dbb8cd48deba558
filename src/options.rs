//! Public legend options and their defaults.

use serde::{Deserialize, Serialize};

use crate::error::LegendError;

/// Direction in which entries flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Entries stack top-to-bottom (default).
    #[default]
    #[serde(alias = "v")]
    Vertical,
    /// Entries flow left-to-right and wrap into rows.
    #[serde(alias = "h")]
    Horizontal,
}

/// Horizontal reference edge of the panel used to interpret `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAnchor {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical reference edge of the panel used to interpret `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAnchor {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// How legend groups are arranged in a vertical, grouped legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupArrangement {
    /// Each group is its own column; columns sit side by side.
    #[default]
    Columns,
    /// Groups stack top-to-bottom, separated by `group_gap`.
    Stacked,
}

/// Font used for entry labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size_px: f64,
    pub color: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size_px: 12.0,
            color: "#444444".to_string(),
        }
    }
}

/// Legend configuration as supplied by the chart engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    /// Master switch; a hidden legend releases its margin.
    pub show: bool,
    pub orientation: Orientation,
    /// Collect entries by legend group id.
    pub grouped: bool,
    /// Only consulted for vertical, grouped legends.
    pub arrangement: GroupArrangement,
    /// Reverse declaration order.
    pub reversed: bool,
    pub anchor_x: XAnchor,
    pub anchor_y: YAnchor,
    /// Fractional position within the plot area; values outside [0, 1] place
    /// the panel in the margins.
    pub x: f64,
    pub y: f64,
    pub border_width: f64,
    pub group_gap: f64,
    pub font: FontConfig,
    pub bg_color: String,
    pub border_color: String,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            show: true,
            orientation: Orientation::Vertical,
            grouped: false,
            arrangement: GroupArrangement::Columns,
            reversed: false,
            anchor_x: XAnchor::Left,
            anchor_y: YAnchor::Top,
            x: 1.02,
            y: 1.0,
            border_width: 0.0,
            group_gap: 10.0,
            font: FontConfig::default(),
            bg_color: "#ffffff".to_string(),
            border_color: "#444444".to_string(),
        }
    }
}

impl LegendOptions {
    /// Reject option values the layout cannot work with.
    pub fn validate(&self) -> Result<(), LegendError> {
        if !self.x.is_finite() {
            return Err(invalid("x", format!("must be finite, got {}", self.x)));
        }
        if !self.y.is_finite() {
            return Err(invalid("y", format!("must be finite, got {}", self.y)));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(invalid(
                "border_width",
                format!("must be a non-negative number, got {}", self.border_width),
            ));
        }
        if !self.group_gap.is_finite() || self.group_gap < 0.0 {
            return Err(invalid(
                "group_gap",
                format!("must be a non-negative number, got {}", self.group_gap),
            ));
        }
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(invalid(
                "font.size_px",
                format!("must be positive, got {}", self.font.size_px),
            ));
        }
        Ok(())
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }
}

fn invalid(field: &'static str, reason: String) -> LegendError {
    LegendError::InvalidOption { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_place_legend_right_of_plot() {
        let o = LegendOptions::default();
        assert!(o.show);
        assert_eq!(o.anchor_x, XAnchor::Left);
        assert_eq!(o.anchor_y, YAnchor::Top);
        assert!(o.x > 1.0);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let o: LegendOptions =
            serde_json::from_str(r#"{"orientation":"h","border_width":2}"#).unwrap();
        assert_eq!(o.orientation, Orientation::Horizontal);
        assert_eq!(o.border_width, 2.0);
        assert_eq!(o.group_gap, 10.0);
    }

    #[test]
    fn negative_border_is_rejected() {
        let o = LegendOptions {
            border_width: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            o.validate(),
            Err(LegendError::InvalidOption { field: "border_width", .. })
        ));
    }
}
