//! Margin negotiation with the chart's margin-allocation service.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::options::{LegendOptions, XAnchor, YAnchor};

/// Key under which the legend's reservation is stored.
pub const LEGEND_MARGIN_KEY: &str = "legend";

/// Space requested around the plot area, anchored at fractional `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginReservation {
    pub x: f64,
    pub y: f64,
    pub l: f64,
    pub r: f64,
    pub t: f64,
    pub b: f64,
}

/// The chart's margin-allocation service. Calls are upserts keyed by `key`:
/// repeated calls overwrite, `None` releases the reservation.
pub trait MarginAllocator {
    fn reserve_margin(&mut self, key: &str, reservation: Option<MarginReservation>);
}

/// In-memory allocator that just remembers the latest reservation per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginBook {
    reservations: BTreeMap<String, MarginReservation>,
}

impl MarginBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MarginReservation> {
        self.reservations.get(key)
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

impl MarginAllocator for MarginBook {
    fn reserve_margin(&mut self, key: &str, reservation: Option<MarginReservation>) {
        match reservation {
            Some(r) => {
                self.reservations.insert(key.to_string(), r);
            }
            None => {
                self.reservations.remove(key);
            }
        }
    }
}

fn horizontal_shares(anchor: XAnchor) -> (f64, f64) {
    match anchor {
        XAnchor::Left => (0.0, 1.0),
        XAnchor::Center => (0.5, 0.5),
        XAnchor::Right => (1.0, 0.0),
    }
}

fn vertical_shares(anchor: YAnchor) -> (f64, f64) {
    // (top, bottom)
    match anchor {
        YAnchor::Top => (0.0, 1.0),
        YAnchor::Middle => (0.5, 0.5),
        YAnchor::Bottom => (1.0, 0.0),
    }
}

/// Reservation for a panel of `width × height`.
pub fn full_reservation(width: f64, height: f64, options: &LegendOptions) -> MarginReservation {
    let (l, r) = horizontal_shares(options.anchor_x);
    let (t, b) = vertical_shares(options.anchor_y);
    MarginReservation {
        x: options.x,
        y: options.y,
        l: width * l,
        r: width * r,
        t: height * t,
        b: height * b,
    }
}

/// Reservation for a panel too tall for the canvas: only horizontal space is
/// claimed, so the plot does not shrink vertically and the legend scrolls.
pub fn horizontal_reservation(width: f64, options: &LegendOptions) -> MarginReservation {
    let (l, r) = horizontal_shares(options.anchor_x);
    MarginReservation {
        x: options.x,
        y: 0.5,
        l: width * l,
        r: width * r,
        t: 0.0,
        b: 0.0,
    }
}

/// Pick the reservation variant for a panel on a canvas of `canvas_height`.
pub fn reservation_for(
    width: f64,
    height: f64,
    canvas_height: f64,
    options: &LegendOptions,
) -> MarginReservation {
    if height > canvas_height {
        horizontal_reservation(width, options)
    } else {
        full_reservation(width, height, options)
    }
}

/// Report the legend's requirement (or its absence) to the allocator.
pub fn negotiate(allocator: &mut dyn MarginAllocator, reservation: Option<MarginReservation>) {
    match &reservation {
        Some(r) => debug!(
            "reserving legend margin l={} r={} t={} b={}",
            r.l, r.r, r.t, r.b
        ),
        None => debug!("releasing legend margin"),
    }
    allocator.reserve_margin(LEGEND_MARGIN_KEY, reservation);
}
