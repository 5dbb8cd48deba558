//! Per-chart legend controller: runs layout passes and routes pointer input.
//!
//! A pass has two stages. [`LegendController::begin_pass`] extracts entries and
//! lays them out with heuristic sizes, so a first render has something to show
//! immediately. [`LegendController::complete_pass`] measures with the real
//! measurer and installs the final state. Starting a new pass supersedes any
//! pending one; completing a superseded pass fails with
//! [`LegendError::StalePass`] and leaves the current state untouched.

use log::{debug, warn};

use crate::error::LegendError;
use crate::margin::{MarginAllocator, negotiate};
use crate::models::{CanvasBounds, ChartInput};
use crate::options::LegendOptions;
use crate::scene::{Scene, build_scene};
use crate::source::{LegendGroup, entry_count, extract_groups, legend_sources};
use crate::state::{LegendState, compute_state};
use crate::text::{HeuristicMeasurer, TextMeasurer, measure_entries};
use crate::toggle::{ClickGuard, VisibilityChange, apply_change};

/// A pass that has been started but not yet measured.
#[derive(Debug, Clone)]
pub struct PendingPass {
    generation: u64,
    groups: Vec<LegendGroup>,
    options: LegendOptions,
    canvas: CanvasBounds,
    static_export: bool,
    approximate: Option<LegendState>,
}

impl PendingPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Layout computed from heuristic sizes; `None` when the legend is empty or
    /// disabled.
    pub fn approximate(&self) -> Option<&LegendState> {
        self.approximate.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct LegendController {
    uid: String,
    generation: u64,
    in_flight: Option<u64>,
    state: Option<LegendState>,
    guard: ClickGuard,
    dragging: bool,
    deferred_redraw: bool,
}

impl LegendController {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn state(&self) -> Option<&LegendState> {
        self.state.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pass_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Scene for the current state; `None` when no panel is shown.
    pub fn scene(&self) -> Option<Scene> {
        self.state.as_ref().map(|s| build_scene(s, &self.uid))
    }

    /// Start a pass. Until it completes, the approximate layout is shown if
    /// nothing has been shown yet.
    pub fn begin_pass(&mut self, input: &ChartInput) -> Result<PendingPass, LegendError> {
        input.legend.validate()?;
        self.generation += 1;
        self.in_flight = Some(self.generation);

        let groups = if input.legend.show {
            extract_groups(&input.traces, &input.hidden_labels, &input.legend)
        } else {
            Vec::new()
        };
        debug!(
            "legend pass {} started: {} entries",
            self.generation,
            entry_count(&groups)
        );

        let approximate = (!groups.is_empty()).then(|| {
            let mut rough = groups.clone();
            measure_entries(&mut rough, &input.legend.font, &HeuristicMeasurer);
            compute_state(
                &rough,
                &input.legend,
                &input.canvas,
                input.static_export,
                self.prior_offset(),
            )
        });
        if self.state.is_none() {
            self.state = approximate.clone();
        }

        Ok(PendingPass {
            generation: self.generation,
            groups,
            options: input.legend.clone(),
            canvas: input.canvas,
            static_export: input.static_export,
            approximate,
        })
    }

    /// Finish `pending` with real measurements and report the margin.
    pub fn complete_pass(
        &mut self,
        pending: PendingPass,
        measurer: &dyn TextMeasurer,
        allocator: &mut dyn MarginAllocator,
    ) -> Result<Option<&LegendState>, LegendError> {
        if pending.generation != self.generation {
            warn!(
                "discarding legend pass {} (current is {})",
                pending.generation, self.generation
            );
            return Err(LegendError::StalePass {
                pass: pending.generation,
                current: self.generation,
            });
        }
        self.in_flight = None;

        let PendingPass {
            mut groups,
            options,
            canvas,
            static_export,
            ..
        } = pending;

        if groups.is_empty() {
            debug!("legend pass {}: nothing to show", self.generation);
            self.state = None;
            negotiate(allocator, None);
            return Ok(None);
        }

        measure_entries(&mut groups, &options.font, measurer);
        let state = compute_state(&groups, &options, &canvas, static_export, self.prior_offset());
        negotiate(allocator, Some(state.margin));
        debug!(
            "legend pass {} complete: {}x{} at ({}, {})",
            self.generation,
            state.computed_width,
            state.computed_height,
            state.position.x,
            state.position.y
        );
        self.state = Some(state);
        Ok(self.state.as_ref())
    }

    /// Both stages back to back.
    pub fn redraw(
        &mut self,
        input: &ChartInput,
        measurer: &dyn TextMeasurer,
        allocator: &mut dyn MarginAllocator,
    ) -> Result<Option<&LegendState>, LegendError> {
        let pending = self.begin_pass(input)?;
        self.complete_pass(pending, measurer, allocator)
    }

    /// Whether a click arrived while a pass was in flight. Reading it clears it;
    /// the caller should redraw once more.
    pub fn take_deferred_redraw(&mut self) -> bool {
        std::mem::take(&mut self.deferred_redraw)
    }

    fn prior_offset(&self) -> f64 {
        self.state.as_ref().map_or(0.0, |s| s.scroll_offset)
    }

    /// Wheel over the panel. Returns whether the content moved.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.state.as_mut().is_some_and(|s| s.wheel(delta_y))
    }

    /// Pointer pressed at canvas `(x, y)`. Starts a scrollbar drag when it lands
    /// on the thumb.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.guard.pointer_down();
        self.dragging = self.state.as_ref().is_some_and(|s| {
            let p = s.to_panel(x, y);
            s.scroll.as_ref().is_some_and(|sc| sc.hits_thumb(p.x, p.y))
        });
    }

    /// Pointer moved with the button held. Returns whether the content moved.
    pub fn pointer_move(&mut self, y: f64) -> bool {
        if !self.dragging {
            return false;
        }
        self.guard.pointer_dragged();
        self.state.as_mut().is_some_and(|s| s.drag_to(y))
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Click at canvas `(x, y)`. See [`LegendController::click_entry`].
    pub fn click(
        &mut self,
        x: f64,
        y: f64,
        input: &mut ChartInput,
        measurer: &dyn TextMeasurer,
        allocator: &mut dyn MarginAllocator,
    ) -> Result<Option<VisibilityChange>, LegendError> {
        if !self.guard.accepts_click() {
            debug!("click after drag ignored");
            return Ok(None);
        }
        match self.state.as_ref().and_then(|s| s.entry_at(x, y)) {
            Some(index) => self.click_entry(index, input, measurer, allocator),
            None => Ok(None),
        }
    }

    /// Toggle the entry with flat index `index`: the change goes to `input`,
    /// then the legend is rebuilt from it. While a pass is in flight the
    /// rebuild is deferred instead.
    pub fn click_entry(
        &mut self,
        index: usize,
        input: &mut ChartInput,
        measurer: &dyn TextMeasurer,
        allocator: &mut dyn MarginAllocator,
    ) -> Result<Option<VisibilityChange>, LegendError> {
        let entry = self
            .state
            .as_ref()
            .and_then(|s| s.entry(index))
            .map(|p| p.entry.clone())
            .ok_or(LegendError::NoSuchEntry(index))?;

        let change = legend_sources(&input.traces, &input.hidden_labels)
            .iter()
            .find_map(|src| src.toggle(&entry));
        let Some(change) = change else {
            return Ok(None);
        };
        apply_change(input, &change);

        if self.in_flight.is_some() {
            self.deferred_redraw = true;
        } else {
            self.redraw(input, measurer, allocator)?;
        }
        Ok(Some(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margin::MarginBook;
    use crate::models::{Trace, TraceVisibility};

    #[test]
    fn click_during_pass_is_deferred() {
        let mut input = ChartInput::new(vec![Trace::new("a")], CanvasBounds::default());
        let mut ctl = LegendController::new("1");
        let mut book = MarginBook::new();
        ctl.redraw(&input, &HeuristicMeasurer, &mut book).unwrap();

        let pending = ctl.begin_pass(&input).unwrap();
        let change = ctl
            .click_entry(0, &mut input, &HeuristicMeasurer, &mut book)
            .unwrap();
        assert!(change.is_some());
        assert_eq!(input.traces[0].visible, TraceVisibility::LegendOnly);
        assert!(ctl.is_pass_in_flight());

        ctl.complete_pass(pending, &HeuristicMeasurer, &mut book).unwrap();
        assert!(ctl.take_deferred_redraw());
        assert!(!ctl.take_deferred_redraw());
    }

    #[test]
    fn first_pass_shows_approximate_layout() {
        let input = ChartInput::new(vec![Trace::new("a")], CanvasBounds::default());
        let mut ctl = LegendController::new("1");
        let pending = ctl.begin_pass(&input).unwrap();
        assert!(ctl.state().is_some());
        assert_eq!(pending.approximate(), ctl.state());
    }
}
