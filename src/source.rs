//! Legend sources and entry extraction.
//!
//! A trace contributes entries to the legend through a [`LegendSource`]:
//! ordinary traces yield one entry each ([`PerTraceSource`]), aggregate
//! traces such as pies yield one entry per category ([`PerCategorySource`]).
//! [`extract_groups`] walks the traces in declaration order and collects the
//! entries into [`LegendGroup`]s.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::models::{Trace, TraceHandle, TraceVisibility};
use crate::options::LegendOptions;
use crate::palette::office_hex;
use crate::toggle::{TraceSelector, VisibilityChange};

/// Opacity of an entry whose trace or category is hidden.
pub const DIMMED_OPACITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Represents a whole trace.
    Trace,
    /// Represents one category of an aggregate trace.
    Category,
}

/// One clickable row or slot of the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub owner: TraceHandle,
    pub kind: EntryKind,
    /// Legend group id of the owning trace (may be empty).
    pub legend_group: String,
    pub is_hidden: bool,
    /// Marker colour (CSS hex).
    pub color: String,
    /// Filled in by measurement; zero until then.
    pub width: f64,
    pub height: f64,
}

impl LegendEntry {
    pub fn new(
        label: impl Into<String>,
        owner: TraceHandle,
        kind: EntryKind,
        group: &str,
        hidden: bool,
        color: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            owner,
            kind,
            legend_group: group.to_string(),
            is_hidden: hidden,
            color: color.into(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn opacity(&self) -> f64 {
        if self.is_hidden { DIMMED_OPACITY } else { 1.0 }
    }
}

/// Ordered entries sharing a group id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendGroup {
    pub id: String,
    pub entries: Vec<LegendEntry>,
}

impl LegendGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }
}

/// Something that contributes entries to the legend and knows how a click on
/// one of them changes visibility.
pub trait LegendSource {
    fn entries(&self) -> Vec<LegendEntry>;

    /// Visibility change requested by clicking `entry`, or `None` when the
    /// entry does not belong to this source.
    fn toggle(&self, entry: &LegendEntry) -> Option<VisibilityChange>;
}

/// One entry for a whole trace.
pub struct PerTraceSource<'a> {
    handle: TraceHandle,
    trace: &'a Trace,
}

impl<'a> PerTraceSource<'a> {
    pub fn new(handle: TraceHandle, trace: &'a Trace) -> Self {
        Self { handle, trace }
    }
}

impl LegendSource for PerTraceSource<'_> {
    fn entries(&self) -> Vec<LegendEntry> {
        vec![LegendEntry::new(
            self.trace.name.clone(),
            self.handle,
            EntryKind::Trace,
            &self.trace.legend_group,
            self.trace.visible == TraceVisibility::LegendOnly,
            self.trace
                .color
                .clone()
                .unwrap_or_else(|| office_hex(self.handle.0).to_string()),
        )]
    }

    fn toggle(&self, entry: &LegendEntry) -> Option<VisibilityChange> {
        if entry.owner != self.handle || entry.kind != EntryKind::Trace {
            return None;
        }
        let target = if self.trace.legend_group.is_empty() {
            TraceSelector::Trace(self.handle)
        } else {
            TraceSelector::Group(self.trace.legend_group.clone())
        };
        Some(VisibilityChange::Trace {
            target,
            visibility: self.trace.visible.toggled(),
        })
    }
}

/// One entry per category label of an aggregate trace. Hidden state comes from
/// the chart-wide hidden-label set, not from the trace.
pub struct PerCategorySource<'a> {
    handle: TraceHandle,
    trace: &'a Trace,
    hidden: &'a [String],
}

impl<'a> PerCategorySource<'a> {
    pub fn new(handle: TraceHandle, trace: &'a Trace, hidden: &'a [String]) -> Self {
        Self {
            handle,
            trace,
            hidden,
        }
    }
}

impl LegendSource for PerCategorySource<'_> {
    fn entries(&self) -> Vec<LegendEntry> {
        self.trace
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                LegendEntry::new(
                    label.clone(),
                    self.handle,
                    EntryKind::Category,
                    &self.trace.legend_group,
                    self.hidden.contains(label),
                    office_hex(i),
                )
            })
            .collect()
    }

    fn toggle(&self, entry: &LegendEntry) -> Option<VisibilityChange> {
        if entry.kind != EntryKind::Category || !self.trace.labels.contains(&entry.label) {
            return None;
        }
        let mut hidden_labels = self.hidden.to_vec();
        let hidden = match hidden_labels.iter().position(|l| *l == entry.label) {
            Some(i) => {
                hidden_labels.remove(i);
                false
            }
            None => {
                hidden_labels.push(entry.label.clone());
                true
            }
        };
        Some(VisibilityChange::Category {
            label: entry.label.clone(),
            hidden,
            hidden_labels,
        })
    }
}

/// Sources for every trace that takes part in the legend, in declaration order.
/// Traces that opt out of the legend or are not drawn at all are skipped.
pub fn legend_sources<'a>(
    traces: &'a [Trace],
    hidden_labels: &'a [String],
) -> Vec<Box<dyn LegendSource + 'a>> {
    traces
        .iter()
        .enumerate()
        .filter(|(_, t)| t.show_legend && t.visible != TraceVisibility::Hidden)
        .map(|(i, t)| -> Box<dyn LegendSource + 'a> {
            let handle = TraceHandle(i);
            if t.kind.is_aggregate() {
                Box::new(PerCategorySource::new(handle, t, hidden_labels))
            } else {
                Box::new(PerTraceSource::new(handle, t))
            }
        })
        .collect()
}

/// Collect legend entries into ordered groups.
///
/// - Categories already contributed by an earlier aggregate trace are skipped.
/// - With `grouped`, entries sharing a non-empty group id form one group (in
///   order of first appearance); entries without a group id get a group of
///   their own. Otherwise a single implicit group holds everything.
/// - An empty result means the panel must be suppressed.
pub fn extract_groups(
    traces: &[Trace],
    hidden_labels: &[String],
    options: &LegendOptions,
) -> Vec<LegendGroup> {
    let mut groups: Vec<LegendGroup> = Vec::new();
    let mut group_index: AHashMap<String, usize> = AHashMap::new();
    let mut seen_categories: AHashSet<String> = AHashSet::new();

    for source in legend_sources(traces, hidden_labels) {
        for entry in source.entries() {
            if entry.kind == EntryKind::Category && !seen_categories.insert(entry.label.clone()) {
                continue;
            }

            let key = if !options.grouped {
                String::new()
            } else if entry.legend_group.is_empty() {
                // ungrouped trace inside a grouped legend: its own group
                format!("~~{}", entry.owner.0)
            } else {
                entry.legend_group.clone()
            };

            let idx = *group_index.entry(key.clone()).or_insert_with(|| {
                groups.push(LegendGroup::new(key));
                groups.len() - 1
            });
            groups[idx].entries.push(entry);
        }
    }

    if options.reversed {
        groups.reverse();
        for g in groups.iter_mut() {
            g.entries.reverse();
        }
    }

    groups
}

/// Total number of entries across groups.
pub fn entry_count(groups: &[LegendGroup]) -> usize {
    groups.iter().map(|g| g.entries.len()).sum()
}
