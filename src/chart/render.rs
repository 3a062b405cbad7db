//! Event renderer for the timeline chart
//!
//! Converts the event snapshot into a retained list of positioned, colored
//! rectangles keyed by event index, plus the derived lane list, categorical
//! color assignment and tooltip/legend content. The renderer owns no input
//! state: redraws rewrite each rectangle's `x`/`width` from the current time
//! scale while `y`/`height` stay fixed for the chart's lifetime.

use crate::chart::scale::{BandScale, TimeScale};
use crate::types::Event;
use chrono::{DateTime, Utc};
use egui::Color32;

/// Tooltip timestamp format
pub const TOOLTIP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %p";

/// Minimum rectangle width so zero-duration events stay visible and clickable
pub const MIN_RECT_WIDTH: f32 = 1.0;

/// The tableau-10 categorical palette
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xf2, 0x8e, 0x2c),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0x76, 0xb7, 0xb2),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0xed, 0xc9, 0x48),
    Color32::from_rgb(0xb0, 0x7a, 0xa1),
    Color32::from_rgb(0xff, 0x9d, 0xa7),
    Color32::from_rgb(0x9c, 0x75, 0x5f),
    Color32::from_rgb(0xba, 0xb0, 0xab),
];

/// One timeline lane: a distinct experiment instance
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub name: String,
    pub uuid: String,
}

/// Derive the ordered lane list from the event snapshot
///
/// One lane per distinct `experiment_id`, in first-seen order. Computed once
/// at mount; never recomputed unless the chart remounts.
pub fn derive_lanes(events: &[Event]) -> Vec<Lane> {
    let mut lanes: Vec<Lane> = Vec::new();
    for event in events {
        if !lanes.iter().any(|l| l.uuid == event.experiment_id) {
            lanes.push(Lane {
                name: event.experiment.clone(),
                uuid: event.experiment_id.clone(),
            });
        }
    }
    lanes
}

/// Deterministic categorical color assignment keyed by experiment id
///
/// The ordinal mapping is built once from the full id domain at mount time;
/// the same id maps to the same color for the chart's lifetime. Ids beyond
/// the palette size wrap around (collisions only after exhaustion).
#[derive(Debug, Clone)]
pub struct ColorPalette {
    ids: Vec<String>,
}

impl ColorPalette {
    pub fn new(events: &[Event]) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for event in events {
            if !ids.contains(&event.experiment_id) {
                ids.push(event.experiment_id.clone());
            }
        }
        Self { ids }
    }

    /// Color for an experiment id; unknown ids fall back to the first entry
    pub fn color(&self, id: &str) -> Color32 {
        let index = self.ids.iter().position(|i| i == id).unwrap_or(0);
        PALETTE[index % PALETTE.len()]
    }
}

/// A positioned rectangle for one event, in chart-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color32,
}

impl EventRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Width of an event's rectangle under the given time scale
///
/// Open-ended events extend to `now`; the result is clamped to
/// [`MIN_RECT_WIDTH`] so just-started events remain visible.
pub fn rect_width(scale: &TimeScale, event: &Event, now: DateTime<Utc>) -> f32 {
    let end = event.finish_time.unwrap_or(now);
    let width = scale.map(end) - scale.map(event.start_time);
    width.max(MIN_RECT_WIDTH)
}

/// Build the full retained rectangle list at mount time
///
/// `top_margin` offsets the vertical band positions into the drawing area.
pub fn layout_rects(
    events: &[Event],
    time: &TimeScale,
    band: &BandScale,
    palette: &ColorPalette,
    top_margin: f32,
    now: DateTime<Utc>,
) -> Vec<EventRect> {
    events
        .iter()
        .map(|event| {
            let y = band.position(&event.experiment_id).unwrap_or(0.0) + top_margin;
            EventRect {
                x: time.map(event.start_time),
                y,
                width: rect_width(time, event, now),
                height: band.bandwidth(),
                color: palette.color(&event.experiment_id),
            }
        })
        .collect()
}

/// Rewrite `x`/`width` from the current time scale, keeping lane geometry
///
/// Called on every transform or viewport change; `rects` and `events` are
/// index-aligned.
pub fn relayout_x(rects: &mut [EventRect], events: &[Event], time: &TimeScale, now: DateTime<Utc>) {
    for (rect, event) in rects.iter_mut().zip(events) {
        rect.x = time.map(event.start_time);
        rect.width = rect_width(time, event, now);
    }
}

/// Tooltip body for a hovered event
pub fn tooltip_text(event: &Event) -> String {
    let mut text = format!(
        "Experiment: {}\nStatus: {}\n\nStart Time: {}",
        event.experiment,
        if event.is_running() { "Running" } else { "Finished" },
        event.start_time.format(TOOLTIP_TIME_FORMAT),
    );
    if let Some(finish) = event.finish_time {
        text.push_str(&format!("\nFinish Time: {}", finish.format(TOOLTIP_TIME_FORMAT)));
    }
    text
}
