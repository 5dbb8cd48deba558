//! Click-to-toggle visibility.
//!
//! A click never mutates the current legend. It produces a
//! [`VisibilityChange`] that is handed to the [`VisibilityOwner`]; the owner
//! updates its model and the legend is redrawn from that model.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{ChartInput, Trace, TraceHandle, TraceVisibility};

/// Traces affected by a per-trace toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceSelector {
    /// Every trace sharing this legend group id.
    Group(String),
    /// A single trace without a legend group.
    Trace(TraceHandle),
}

impl TraceSelector {
    pub fn matches(&self, handle: TraceHandle, trace: &Trace) -> bool {
        match self {
            TraceSelector::Group(g) => trace.legend_group == *g,
            TraceSelector::Trace(h) => *h == handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VisibilityChange {
    /// A category of an aggregate trace was shown or hidden.
    Category {
        label: String,
        hidden: bool,
        /// The complete hidden set after the change.
        hidden_labels: Vec<String>,
    },
    /// Traces switch between visible and legend-only.
    Trace {
        target: TraceSelector,
        visibility: TraceVisibility,
    },
}

/// Owner of trace visibility and hidden categories.
pub trait VisibilityOwner {
    fn set_hidden(&mut self, category_label: &str, hidden: bool);
    fn set_trace_visibility(&mut self, target: &TraceSelector, visibility: TraceVisibility);
}

/// Deliver a change to its owner.
pub fn apply_change(owner: &mut dyn VisibilityOwner, change: &VisibilityChange) {
    match change {
        VisibilityChange::Category { label, hidden, .. } => {
            debug!("legend toggle: category {label:?} hidden={hidden}");
            owner.set_hidden(label, *hidden);
        }
        VisibilityChange::Trace { target, visibility } => {
            debug!("legend toggle: {target:?} -> {visibility:?}");
            owner.set_trace_visibility(target, *visibility);
        }
    }
}

/// A chart description acts as its own visibility owner: toggles edit the
/// traces and the hidden-label list, and the next redraw reads them back.
impl VisibilityOwner for ChartInput {
    fn set_hidden(&mut self, category_label: &str, hidden: bool) {
        let pos = self.hidden_labels.iter().position(|l| l == category_label);
        match (hidden, pos) {
            (true, None) => self.hidden_labels.push(category_label.to_string()),
            (false, Some(i)) => {
                self.hidden_labels.remove(i);
            }
            _ => {}
        }
    }

    fn set_trace_visibility(&mut self, target: &TraceSelector, visibility: TraceVisibility) {
        for (i, trace) in self.traces.iter_mut().enumerate() {
            if target.matches(TraceHandle(i), trace) {
                trace.visible = visibility;
            }
        }
    }
}

/// Suppresses the click that ends a drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickGuard {
    dragged: bool,
}

impl ClickGuard {
    pub fn pointer_down(&mut self) {
        self.dragged = false;
    }

    pub fn pointer_dragged(&mut self) {
        self.dragged = true;
    }

    /// Whether a click arriving now should be acted upon.
    pub fn accepts_click(&self) -> bool {
        !self.dragged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanvasBounds;

    #[test]
    fn group_selector_flips_every_member() {
        let mut chart = ChartInput::new(
            vec![
                Trace::new("a").in_group("g"),
                Trace::new("b").in_group("g"),
                Trace::new("c"),
            ],
            CanvasBounds::default(),
        );
        chart.set_trace_visibility(
            &TraceSelector::Group("g".into()),
            TraceVisibility::LegendOnly,
        );
        let vis: Vec<_> = chart.traces.iter().map(|t| t.visible).collect();
        assert_eq!(
            vis,
            vec![
                TraceVisibility::LegendOnly,
                TraceVisibility::LegendOnly,
                TraceVisibility::Visible
            ]
        );
    }

    #[test]
    fn drag_suppresses_click_until_next_press() {
        let mut g = ClickGuard::default();
        assert!(g.accepts_click());
        g.pointer_down();
        g.pointer_dragged();
        assert!(!g.accepts_click());
        g.pointer_down();
        assert!(g.accepts_click());
    }
}
