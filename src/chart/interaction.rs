//! Interaction controller for the timeline chart
//!
//! Owns the pan/zoom [`Transform`], the click-driven zoom-to-event
//! animation, the debounced resize handling and the hover tooltip state.
//! The controller is the only writer of interaction state; the renderer
//! reads it on the same thread each frame, so no locking is needed.
//!
//! State machine: `Idle -> Gesturing` on a drag or wheel gesture,
//! `Gesturing -> Idle` on gesture end, `Idle -> Animating` on a zoom
//! request. A new gesture or zoom request preempts an in-flight animation
//! immediately; the latest request wins and nothing is queued.

use crate::chart::scale::Transform;
use egui::emath::easing;
use egui::{Pos2, Vec2};
use std::time::{Duration, Instant};

/// A fixed-duration transform transition
#[derive(Debug, Clone)]
pub struct ZoomAnimation {
    from: Transform,
    to: Transform,
    started: Instant,
    duration: Duration,
}

impl ZoomAnimation {
    pub fn new(from: Transform, to: Transform, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// The animation's final transform
    pub fn target(&self) -> Transform {
        self.to
    }

    pub fn finished(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.duration
    }

    /// Eased transform at the given instant
    pub fn value_at(&self, now: Instant) -> Transform {
        let elapsed = now.duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        Transform::lerp(&self.from, &self.to, easing::cubic_in_out(t))
    }
}

/// Interaction controller states
#[derive(Debug, Clone)]
pub enum InteractionState {
    Idle,
    Gesturing,
    Animating(ZoomAnimation),
}

/// Pan/zoom state owner
#[derive(Debug)]
pub struct Interaction {
    pub state: InteractionState,
    pub transform: Transform,
    min_scale: f32,
    max_scale: f32,
    zoom_duration: Duration,
}

impl Interaction {
    pub fn new(min_scale: f32, max_scale: f32, zoom_duration: Duration) -> Self {
        Self {
            state: InteractionState::Idle,
            transform: Transform::IDENTITY,
            min_scale,
            max_scale,
            zoom_duration,
        }
    }

    /// Whether a zoom animation is currently running
    pub fn is_animating(&self) -> bool {
        matches!(self.state, InteractionState::Animating(_))
    }

    /// Enter the gesturing state, cancelling any in-flight animation
    pub fn begin_gesture(&mut self) {
        self.state = InteractionState::Gesturing;
    }

    /// Leave the gesturing state
    pub fn end_gesture(&mut self) {
        if matches!(self.state, InteractionState::Gesturing) {
            self.state = InteractionState::Idle;
        }
    }

    /// Pan by a screen-space delta (a continuous gesture step)
    pub fn pan(&mut self, delta: Vec2) {
        self.begin_gesture();
        self.transform = self.transform.panned_by(delta.x, delta.y);
    }

    /// Zoom by a factor about a pixel pivot (wheel gesture step)
    pub fn zoom_about(&mut self, factor: f32, pivot_x: f32) {
        self.begin_gesture();
        self.transform =
            self.transform
                .zoomed_about(factor, pivot_x, self.min_scale, self.max_scale);
    }

    /// Start an animated transition to the target transform
    ///
    /// Preempts any in-flight animation; the previous target is discarded.
    pub fn request_zoom(&mut self, target: Transform, now: Instant) {
        let target = target.clamp_scale(self.min_scale, self.max_scale);
        self.state = InteractionState::Animating(ZoomAnimation::new(
            self.transform,
            target,
            now,
            self.zoom_duration,
        ));
    }

    /// Advance the animation; returns true while a repaint is still needed
    pub fn tick(&mut self, now: Instant) -> bool {
        if let InteractionState::Animating(anim) = &self.state {
            if anim.finished(now) {
                self.transform = anim.target();
                self.state = InteractionState::Idle;
                false
            } else {
                self.transform = anim.value_at(now);
                true
            }
        } else {
            false
        }
    }
}

/// Debounces container width changes into a single relayout
///
/// A width change only commits after it has held steady for the quiescence
/// window, coalescing redraw storms during a continuous resize.
#[derive(Debug)]
pub struct ResizeDebouncer {
    width: f32,
    pending: Option<(f32, Instant)>,
    quiescence: Duration,
}

impl ResizeDebouncer {
    pub fn new(width: f32, quiescence: Duration) -> Self {
        Self {
            width,
            pending: None,
            quiescence,
        }
    }

    /// The last committed width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Observe the current container width; returns the new width once the
    /// change has settled.
    pub fn observe(&mut self, width: f32, now: Instant) -> Option<f32> {
        if (width - self.width).abs() < f32::EPSILON {
            // Back to the committed width before the window elapsed
            self.pending = None;
            return None;
        }

        match self.pending {
            Some((w, since)) if (w - width).abs() < f32::EPSILON => {
                if now.duration_since(since) >= self.quiescence {
                    self.width = width;
                    self.pending = None;
                    Some(width)
                } else {
                    None
                }
            }
            _ => {
                self.pending = Some((width, now));
                None
            }
        }
    }

    /// Whether a width change is waiting out the quiescence window
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Hover tooltip state, recreated per hover but never destroyed
#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    pub visible: bool,
    pub pos: Pos2,
    pub event_index: usize,
}

/// Vertical offset below the cursor
const TOOLTIP_OFFSET_Y: f32 = 50.0;
/// Upward shift when flipping near the bottom edge
const TOOLTIP_FLIP_Y: f32 = 200.0;

/// Position the tooltip near the cursor with edge avoidance
///
/// Flips horizontally once the cursor passes 2/3 of the container width and
/// vertically past 2/3 of the height, with fixed offsets.
pub fn place_tooltip(cursor: Pos2, tooltip_size: Vec2, container: Vec2) -> Pos2 {
    let mut x = cursor.x;
    let mut y = cursor.y + TOOLTIP_OFFSET_Y;

    if cursor.x > container.x / 3.0 * 2.0 {
        x -= tooltip_size.x;
    }
    if cursor.y + TOOLTIP_OFFSET_Y > container.y / 3.0 * 2.0 {
        y -= TOOLTIP_FLIP_Y;
    }

    Pos2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction() -> Interaction {
        Interaction::new(0.1, 5.0, Duration::from_millis(750))
    }

    #[test]
    fn test_gesture_transitions() {
        let mut i = interaction();
        assert!(matches!(i.state, InteractionState::Idle));

        i.pan(Vec2::new(10.0, 0.0));
        assert!(matches!(i.state, InteractionState::Gesturing));
        assert_eq!(i.transform.translate_x, 10.0);

        i.end_gesture();
        assert!(matches!(i.state, InteractionState::Idle));
    }

    #[test]
    fn test_animation_runs_to_target() {
        let mut i = interaction();
        let target = Transform {
            translate_x: 100.0,
            translate_y: 0.0,
            scale: 2.0,
        };
        let t0 = Instant::now();
        i.request_zoom(target, t0);
        assert!(i.is_animating());

        assert!(i.tick(t0 + Duration::from_millis(375)));
        assert!(i.transform.scale > 1.0 && i.transform.scale < 2.0);

        assert!(!i.tick(t0 + Duration::from_millis(800)));
        assert_eq!(i.transform, target);
        assert!(matches!(i.state, InteractionState::Idle));
    }

    #[test]
    fn test_second_zoom_request_preempts_first() {
        let mut i = interaction();
        let first = Transform {
            translate_x: 100.0,
            translate_y: 0.0,
            scale: 2.0,
        };
        let second = Transform {
            translate_x: -300.0,
            translate_y: 0.0,
            scale: 4.0,
        };

        let t0 = Instant::now();
        i.request_zoom(first, t0);
        i.tick(t0 + Duration::from_millis(300));
        i.request_zoom(second, t0 + Duration::from_millis(300));

        // Run the second animation to completion; only its target applies
        i.tick(t0 + Duration::from_millis(1100));
        assert_eq!(i.transform, second);
    }

    #[test]
    fn test_gesture_preempts_animation() {
        let mut i = interaction();
        let t0 = Instant::now();
        i.request_zoom(
            Transform {
                translate_x: 50.0,
                translate_y: 0.0,
                scale: 3.0,
            },
            t0,
        );
        i.tick(t0 + Duration::from_millis(100));

        i.zoom_about(1.1, 200.0);
        assert!(matches!(i.state, InteractionState::Gesturing));

        // The abandoned animation never completes
        assert!(!i.tick(t0 + Duration::from_secs(2)));
        assert_ne!(i.transform.translate_x, 50.0);
    }

    #[test]
    fn test_zoom_request_scale_clamped() {
        let mut i = interaction();
        let t0 = Instant::now();
        i.request_zoom(
            Transform {
                translate_x: 0.0,
                translate_y: 0.0,
                scale: 50.0,
            },
            t0,
        );
        i.tick(t0 + Duration::from_secs(1));
        assert_eq!(i.transform.scale, 5.0);
    }

    #[test]
    fn test_resize_debouncer_waits_for_quiescence() {
        let q = Duration::from_millis(250);
        let mut d = ResizeDebouncer::new(800.0, q);
        let t0 = Instant::now();

        assert_eq!(d.observe(900.0, t0), None);
        assert!(d.is_pending());
        assert_eq!(d.observe(900.0, t0 + Duration::from_millis(100)), None);
        assert_eq!(d.observe(900.0, t0 + Duration::from_millis(300)), Some(900.0));
        assert_eq!(d.width(), 900.0);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_resize_debouncer_coalesces_bursts() {
        let q = Duration::from_millis(250);
        let mut d = ResizeDebouncer::new(800.0, q);
        let t0 = Instant::now();

        assert_eq!(d.observe(850.0, t0), None);
        // Width keeps changing; the window restarts each time
        assert_eq!(d.observe(900.0, t0 + Duration::from_millis(200)), None);
        assert_eq!(d.observe(900.0, t0 + Duration::from_millis(300)), None);
        assert_eq!(d.observe(900.0, t0 + Duration::from_millis(500)), Some(900.0));
    }

    #[test]
    fn test_resize_debouncer_cancelled_by_returning() {
        let q = Duration::from_millis(250);
        let mut d = ResizeDebouncer::new(800.0, q);
        let t0 = Instant::now();

        d.observe(900.0, t0);
        assert_eq!(d.observe(800.0, t0 + Duration::from_millis(100)), None);
        assert!(!d.is_pending());
        assert_eq!(d.width(), 800.0);
    }

    #[test]
    fn test_tooltip_placement_flips_near_edges() {
        let container = Vec2::new(900.0, 600.0);
        let size = Vec2::new(150.0, 80.0);

        // Top-left region: below and to the right of the cursor
        let p = place_tooltip(Pos2::new(100.0, 100.0), size, container);
        assert_eq!(p, Pos2::new(100.0, 150.0));

        // Past 2/3 width: flipped left by the tooltip width
        let p = place_tooltip(Pos2::new(700.0, 100.0), size, container);
        assert_eq!(p.x, 550.0);

        // Past 2/3 height: shifted up by the fixed flip offset
        let p = place_tooltip(Pos2::new(100.0, 500.0), size, container);
        assert_eq!(p.y, 350.0);
    }

    #[test]
    fn test_animation_eases_through_midpoint() {
        let from = Transform::IDENTITY;
        let to = Transform {
            translate_x: 100.0,
            translate_y: 0.0,
            scale: 3.0,
        };
        let t0 = Instant::now();
        let anim = ZoomAnimation::new(from, to, t0, Duration::from_millis(750));

        assert_eq!(anim.value_at(t0), from);
        assert_eq!(anim.value_at(t0 + Duration::from_millis(750)), to);
        // Cubic in-out crosses the linear midpoint at t = 0.5
        let mid = anim.value_at(t0 + Duration::from_millis(375));
        assert!((mid.translate_x - 50.0).abs() < 0.5);
        assert!((mid.scale - 2.0).abs() < 0.01);
    }
}
