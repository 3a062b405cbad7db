//! Event timeline visualization engine
//!
//! An interactive, zoomable, time-scaled chart that renders time-interval
//! events in per-experiment lanes, hand-painted on egui's low-level drawing
//! primitives. Composed of three pieces:
//!
//! - [`scale`] - time/band scales, axis ticks, the zoom [`Transform`]
//! - [`render`] - event rectangles, color palette, legend and tooltip content
//! - [`interaction`] - pan/zoom state machine, zoom-to-event animation,
//!   resize debounce, tooltip placement
//!
//! [`EventsChart`] is the orchestrator binding them to one mounted widget.
//! All interaction state lives inside the chart value; dropping it releases
//! everything (no global listeners to tear down).

pub mod interaction;
pub mod render;
pub mod scale;

pub use interaction::{Interaction, InteractionState, ResizeDebouncer, TooltipState};
pub use render::{ColorPalette, EventRect, Lane};
pub use scale::{BandScale, TimeScale, Transform};

use crate::config::ChartConfig;
use crate::error::{DashboardError, Result};
use crate::types::Event;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};
use std::time::{Duration, Instant};

/// Callback invoked with the full event record when a rectangle is clicked
pub type SelectCallback = Box<dyn FnMut(&Event) + Send>;

/// Height reserved for the legend strip below the canvas
const LEGEND_HEIGHT: f32 = 24.0;

/// Axis label font size
const AXIS_FONT_SIZE: f32 = 10.0;

/// Pixel geometry resolved once the container size is known
struct ChartLayout {
    /// Base time scale; its range is rebuilt on debounced resizes while the
    /// domain never resets
    time: TimeScale,
    band: BandScale,
    /// Retained rectangle list, index-aligned with the event snapshot
    rects: Vec<EventRect>,
    debouncer: ResizeDebouncer,
    height: f32,
}

/// The mounted timeline chart
///
/// Built once from a read-only event snapshot; a fresh chart is required to
/// reflect new data. The snapshot is sorted by `start_time` at construction
/// so the initial window derivation holds for unsorted input.
pub struct EventsChart {
    events: Vec<Event>,
    lanes: Vec<Lane>,
    palette: ColorPalette,
    on_select: Option<SelectCallback>,
    cfg: ChartConfig,
    interaction: Interaction,
    tooltip: TooltipState,
    layout: Option<ChartLayout>,
    /// Initial one-hour domain, ending 30 minutes after the latest start
    domain: (DateTime<Utc>, DateTime<Utc>),
}

impl EventsChart {
    /// Mount a chart over a non-empty event snapshot
    ///
    /// Returns an error for an empty snapshot; the empty state belongs to
    /// the surrounding page, not this widget.
    pub fn new(
        mut events: Vec<Event>,
        on_select: Option<SelectCallback>,
        cfg: ChartConfig,
    ) -> Result<Self> {
        if events.is_empty() {
            return Err(DashboardError::Chart(
                "at least one event is required to mount the timeline".to_string(),
            ));
        }
        events.sort_by_key(|e| e.start_time);

        let latest = events[events.len() - 1].start_time;
        let half_hour_later = latest + ChronoDuration::minutes(30);
        let domain = (half_hour_later - ChronoDuration::hours(1), half_hour_later);

        let lanes = render::derive_lanes(&events);
        let palette = ColorPalette::new(&events);
        let interaction = Interaction::new(
            cfg.min_scale,
            cfg.max_scale,
            Duration::from_millis(cfg.zoom_duration_ms),
        );

        Ok(Self {
            events,
            lanes,
            palette,
            on_select,
            cfg,
            interaction,
            tooltip: TooltipState::default(),
            layout: None,
            domain,
        })
    }

    /// The derived lanes, in first-seen order
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// The sorted event snapshot
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Render one frame and service interactions
    pub fn show(&mut self, ui: &mut Ui) {
        let now = Instant::now();
        let wall_now = Utc::now();

        let available = ui.available_rect_before_wrap();
        let canvas_size = Vec2::new(
            available.width(),
            (available.height() - LEGEND_HEIGHT).max(120.0),
        );
        let (response, painter) = ui.allocate_painter(canvas_size, Sense::click_and_drag());
        let canvas = response.rect;

        self.ensure_layout(canvas, wall_now);
        self.observe_resize(canvas, now, wall_now);

        if self.interaction.tick(now) {
            ui.ctx().request_repaint();
        }

        // Gestures preempt any in-flight zoom animation
        if response.drag_started() {
            self.interaction.begin_gesture();
        }
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                self.interaction.pan(delta);
            }
        }
        if response.drag_stopped() {
            self.interaction.end_gesture();
        }
        if response.hovered() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            let factor = (1.0 + scroll * 0.002) * pinch;
            if (factor - 1.0).abs() > f32::EPSILON {
                if let Some(pointer) = response.hover_pos() {
                    self.interaction.zoom_about(factor, pointer.x - canvas.left());
                }
                self.interaction.end_gesture();
            }
        }

        // Recompute x/width from the rescaled scale; lane geometry is fixed
        let layout = self.layout.as_mut().expect("layout initialized above");
        let current = self.interaction.transform.rescale(&layout.time);
        render::relayout_x(&mut layout.rects, &self.events, &current, wall_now);

        let pointer_local = response
            .hover_pos()
            .map(|p| Pos2::new(p.x - canvas.left(), p.y - canvas.top()));
        let hovered_index = pointer_local.and_then(|p| {
            layout
                .rects
                .iter()
                .rposition(|r| r.contains(p.x, p.y))
        });

        // Click: selection callback plus zoom-to-event, base-scale anchored
        let mut zoom_request = None;
        if response.clicked() {
            if let Some(index) = hovered_index {
                let event = &self.events[index];
                if let Some(callback) = self.on_select.as_mut() {
                    callback(event);
                }
                zoom_request = Some(layout.time.map(event.start_time));
            }
        }

        // Tooltip follows the hovered rectangle; hiding keeps the state
        if let (Some(index), Some(cursor)) = (hovered_index, pointer_local) {
            let text = render::tooltip_text(&self.events[index]);
            let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), Color32::BLACK);
            let size = galley.size() + Vec2::new(16.0, 8.0);
            self.tooltip.visible = true;
            self.tooltip.event_index = index;
            self.tooltip.pos = interaction::place_tooltip(cursor, size, canvas.size());
        } else {
            self.tooltip.visible = false;
        }

        self.paint(ui, &painter, canvas, &current);

        if let Some(base_x) = zoom_request {
            let target =
                Transform::centered_on(canvas.width(), self.cfg.click_zoom_scale, base_x);
            self.interaction.request_zoom(target, now);
            ui.ctx().request_repaint();
        }

        self.show_legend(ui, canvas, now);

        if self
            .layout
            .as_ref()
            .is_some_and(|l| l.debouncer.is_pending())
        {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }
    }

    /// Build scales and the retained rectangle list on the first frame
    fn ensure_layout(&mut self, canvas: Rect, wall_now: DateTime<Utc>) {
        if self.layout.is_some() {
            return;
        }

        let cfg = &self.cfg;
        let width = canvas.width();
        let height = canvas.height();
        let time = TimeScale::new(
            self.domain.0,
            self.domain.1,
            (cfg.margin_left, width - cfg.margin_right),
        );
        let band = BandScale::new(
            self.lanes.iter().map(|l| l.uuid.clone()).collect(),
            (0.0, height - cfg.margin_top - cfg.margin_bottom),
        );
        let rects = render::layout_rects(
            &self.events,
            &time,
            &band,
            &self.palette,
            cfg.margin_top,
            wall_now,
        );

        self.layout = Some(ChartLayout {
            time,
            band,
            rects,
            debouncer: ResizeDebouncer::new(
                width,
                Duration::from_millis(cfg.resize_debounce_ms),
            ),
            height,
        });
    }

    /// Rebuild the base range once a width change settles
    fn observe_resize(&mut self, canvas: Rect, now: Instant, wall_now: DateTime<Utc>) {
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        if let Some(new_width) = layout.debouncer.observe(canvas.width(), now) {
            layout
                .time
                .set_range((self.cfg.margin_left, new_width - self.cfg.margin_right));
            let current = self.interaction.transform.rescale(&layout.time);
            render::relayout_x(&mut layout.rects, &self.events, &current, wall_now);
            tracing::debug!("Timeline relayout at width {}", new_width);
        }
    }

    fn paint(&self, ui: &Ui, painter: &egui::Painter, canvas: Rect, current: &TimeScale) {
        let cfg = &self.cfg;
        let layout = self.layout.as_ref().expect("layout initialized");
        let axis_color = ui.visuals().weak_text_color();
        let text_color = ui.visuals().text_color();

        // Event rectangles, clipped so they never overrun the axis area
        let clip = Rect::from_min_size(
            canvas.min + Vec2::new(cfg.margin_left, 0.0),
            Vec2::new(
                canvas.width() - cfg.margin_left - cfg.margin_right,
                canvas.height() - cfg.margin_bottom,
            ),
        );
        let clipped = painter.with_clip_rect(clip);
        for rect in &layout.rects {
            clipped.rect_filled(
                Rect::from_min_size(
                    canvas.min + Vec2::new(rect.x, rect.y),
                    Vec2::new(rect.width, rect.height),
                ),
                0.0,
                rect.color,
            );
        }

        // Lane tick marks on the left edge
        for lane in &self.lanes {
            if let Some(y) = layout.band.position(&lane.uuid) {
                let cy = canvas.top() + cfg.margin_top + y + layout.band.bandwidth() / 2.0;
                painter.line_segment(
                    [
                        Pos2::new(canvas.left() + cfg.margin_left - 6.0, cy),
                        Pos2::new(canvas.left() + cfg.margin_left, cy),
                    ],
                    Stroke::new(1.0, axis_color),
                );
            }
        }

        // Time axis: baseline, ticks and wrapped labels regenerated from the
        // current (rescaled) scale
        let axis_y = canvas.top() + layout.height - cfg.margin_bottom;
        painter.line_segment(
            [
                Pos2::new(canvas.left() + cfg.margin_left, axis_y),
                Pos2::new(canvas.right() - cfg.margin_right, axis_y),
            ],
            Stroke::new(1.0, axis_color),
        );

        let font = FontId::proportional(AXIS_FONT_SIZE);
        let (r0, r1) = current.range();
        for tick in current.ticks(cfg.tick_count) {
            if tick.x < r0 - 0.5 || tick.x > r1 + 0.5 {
                continue;
            }
            let x = canvas.left() + tick.x;
            painter.line_segment(
                [Pos2::new(x, axis_y), Pos2::new(x, axis_y + 4.0)],
                Stroke::new(1.0, axis_color),
            );

            let lines = scale::wrap_text(&tick.label, cfg.tick_label_max_width, |s| {
                painter
                    .layout_no_wrap(s.to_string(), font.clone(), text_color)
                    .size()
                    .x
            });
            for (i, line) in lines.iter().enumerate() {
                painter.text(
                    Pos2::new(x, axis_y + 6.0 + i as f32 * (AXIS_FONT_SIZE + 1.0)),
                    Align2::CENTER_TOP,
                    line,
                    font.clone(),
                    text_color,
                );
            }
        }

        self.paint_tooltip(ui, painter, canvas);
    }

    /// The tooltip fades via an opacity transition; the state persists across
    /// hovers and is only overwritten by the next one.
    fn paint_tooltip(&self, ui: &Ui, painter: &egui::Painter, canvas: Rect) {
        let opacity = ui.ctx().animate_bool_with_time(
            ui.id().with("timeline_tooltip"),
            self.tooltip.visible,
            0.25,
        );
        if opacity <= 0.0 {
            return;
        }

        let event = &self.events[self.tooltip.event_index];
        let galley = painter.layout_no_wrap(
            render::tooltip_text(event),
            FontId::proportional(12.0),
            Color32::BLACK,
        );
        let pos = canvas.min + self.tooltip.pos.to_vec2();
        let frame = Rect::from_min_size(pos, galley.size() + Vec2::new(16.0, 8.0));
        painter.rect_filled(frame, 4.0, Color32::WHITE.gamma_multiply(opacity));
        painter.rect_stroke(
            frame,
            4.0,
            Stroke::new(1.0, Color32::from_black_alpha(30).gamma_multiply(opacity)),
            StrokeKind::Outside,
        );
        painter.galley(
            pos + Vec2::new(8.0, 4.0),
            galley,
            Color32::BLACK.gamma_multiply(opacity),
        );
    }

    /// Legend strip: one swatch + name per lane; clicking zooms to the
    /// lane's most recent event (no selection callback).
    fn show_legend(&mut self, ui: &mut Ui, canvas: Rect, now: Instant) {
        let mut zoom_target = None;

        ui.horizontal_wrapped(|ui| {
            for lane in &self.lanes {
                let (swatch, swatch_resp) =
                    ui.allocate_exact_size(Vec2::splat(14.0), Sense::click());
                ui.painter()
                    .rect_filled(swatch, 2.0, self.palette.color(&lane.uuid));
                let label_resp = ui.add(
                    egui::Label::new(egui::RichText::new(&lane.name).small().strong())
                        .sense(Sense::click()),
                );

                if swatch_resp.clicked() || label_resp.clicked() {
                    // Most recent event for this lane; snapshot is sorted
                    if let Some(event) = self
                        .events
                        .iter()
                        .rev()
                        .find(|e| e.experiment_id == lane.uuid)
                    {
                        zoom_target = Some(event.start_time);
                    }
                }
                ui.add_space(8.0);
            }
        });

        if let Some(start) = zoom_target {
            if let Some(layout) = self.layout.as_ref() {
                let target = Transform::centered_on(
                    canvas.width(),
                    self.cfg.click_zoom_scale,
                    layout.time.map(start),
                );
                self.interaction.request_zoom(target, now);
                ui.ctx().request_repaint();
            }
        }
    }
}
