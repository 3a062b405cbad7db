//! Scale and axis engine for the event timeline
//!
//! Maps domain values (timestamps, lane ids) to pixel coordinates and
//! produces renderable axis ticks. Three pieces:
//!
//! - [`TimeScale`] - linear, invertible time-to-pixel mapping
//! - [`BandScale`] - categorical lane-to-pixel band mapping with padding
//! - [`Transform`] - the pan/zoom state composed on top of the base scale
//!
//! All coordinates are in the chart's local space (origin at the top-left of
//! the drawing area). The scales are plain value types so they can be tested
//! headless.

use chrono::{DateTime, Utc};

/// Tick label time format (month-day hour:minute)
pub const TICK_FORMAT: &str = "%m-%d %H:%M";

/// Candidate tick steps in milliseconds, smallest first
const TICK_STEPS_MS: [f64; 16] = [
    1_000.0,        // 1s
    5_000.0,        // 5s
    15_000.0,       // 15s
    30_000.0,       // 30s
    60_000.0,       // 1m
    300_000.0,      // 5m
    900_000.0,      // 15m
    1_800_000.0,    // 30m
    3_600_000.0,    // 1h
    7_200_000.0,    // 2h
    14_400_000.0,   // 4h
    28_800_000.0,   // 8h
    43_200_000.0,   // 12h
    86_400_000.0,   // 1d
    172_800_000.0,  // 2d
    604_800_000.0,  // 7d
];

/// A renderable time-axis tick
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel position along the x axis
    pub x: f32,
    /// Formatted label, not yet wrapped
    pub label: String,
}

/// Linear, monotonic, invertible mapping from a time domain to a pixel range
///
/// The domain is kept as milliseconds since the Unix epoch so interpolation
/// stays in plain `f64` arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    d0: f64,
    d1: f64,
    r0: f32,
    r1: f32,
}

impl TimeScale {
    /// Build a scale from a time domain and pixel range
    ///
    /// The domain must be non-degenerate (`start < end`).
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f32, f32)) -> Self {
        Self::from_ms(
            start.timestamp_millis() as f64,
            end.timestamp_millis() as f64,
            range,
        )
    }

    /// Build a scale from a raw millisecond domain
    pub fn from_ms(d0: f64, d1: f64, range: (f32, f32)) -> Self {
        debug_assert!(d0 < d1, "time scale domain must be non-degenerate");
        Self {
            d0,
            d1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// Map a timestamp to a pixel position
    pub fn map(&self, t: DateTime<Utc>) -> f32 {
        self.map_ms(t.timestamp_millis() as f64)
    }

    /// Map raw milliseconds to a pixel position
    pub fn map_ms(&self, ms: f64) -> f32 {
        let fraction = (ms - self.d0) / (self.d1 - self.d0);
        self.r0 + fraction as f32 * (self.r1 - self.r0)
    }

    /// Map a pixel position back to milliseconds
    pub fn invert(&self, px: f32) -> f64 {
        let fraction = ((px - self.r0) / (self.r1 - self.r0)) as f64;
        self.d0 + fraction * (self.d1 - self.d0)
    }

    /// The current domain, in milliseconds
    pub fn domain_ms(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    /// The current pixel range
    pub fn range(&self) -> (f32, f32) {
        (self.r0, self.r1)
    }

    /// Replace the pixel range, keeping the domain (used on resize)
    pub fn set_range(&mut self, range: (f32, f32)) {
        self.r0 = range.0;
        self.r1 = range.1;
    }

    /// Generate around `count` ticks at nice time boundaries
    ///
    /// Tick text regenerates from the current domain, so label wrapping must
    /// be reapplied by the caller after every zoom or resize.
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let span = self.d1 - self.d0;
        if span <= 0.0 || count == 0 {
            return Vec::new();
        }

        let target = span / count as f64;
        let step = TICK_STEPS_MS
            .iter()
            .copied()
            .find(|s| *s >= target)
            .unwrap_or(TICK_STEPS_MS[TICK_STEPS_MS.len() - 1]);

        let mut ticks = Vec::new();
        let mut ms = (self.d0 / step).ceil() * step;
        while ms <= self.d1 {
            let label = DateTime::<Utc>::from_timestamp_millis(ms as i64)
                .map(|t| t.format(TICK_FORMAT).to_string())
                .unwrap_or_default();
            ticks.push(Tick {
                x: self.map_ms(ms),
                label,
            });
            ms += step;
        }
        ticks
    }
}

/// Categorical-to-pixel band mapping with 0.5 padding on both sides
///
/// Allocates one equal-width band per lane id, in insertion order, over the
/// vertical range. With a padding ratio of 0.5 the gap between bands equals
/// the band width itself.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    ids: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

/// Inner and outer padding ratio of the band scale
const BAND_PADDING: f32 = 0.5;

impl BandScale {
    /// Build a band scale over the ordered lane ids and pixel range
    pub fn new(ids: Vec<String>, range: (f32, f32)) -> Self {
        let n = ids.len().max(1) as f32;
        let extent = range.1 - range.0;
        let step = extent / (n - BAND_PADDING + BAND_PADDING * 2.0).max(1.0);
        let start = range.0 + (extent - step * (n - BAND_PADDING)) * 0.5;
        let bandwidth = step * (1.0 - BAND_PADDING);
        Self {
            ids,
            start,
            step,
            bandwidth,
        }
    }

    /// Top edge of the band for the given lane id
    pub fn position(&self, id: &str) -> Option<f32> {
        self.ids
            .iter()
            .position(|i| i == id)
            .map(|i| self.start + self.step * i as f32)
    }

    /// Height of every band
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    /// Ordered lane ids forming the domain
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// The current pan/zoom state applied on top of the base time scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Apply the transform to a base-scale x coordinate
    pub fn apply_x(&self, x: f32) -> f32 {
        self.translate_x + self.scale * x
    }

    /// Clamp the zoom scale to the given extent
    pub fn clamp_scale(mut self, min: f32, max: f32) -> Self {
        self.scale = self.scale.clamp(min, max);
        self
    }

    /// Derive the zoomed time scale from a base scale
    ///
    /// The result maps `t` to `translate_x + scale * base.map(t)` while
    /// keeping the base pixel range, so renderers can use it directly.
    pub fn rescale(&self, base: &TimeScale) -> TimeScale {
        let (r0, r1) = base.range();
        let d0 = base.invert((r0 - self.translate_x) / self.scale);
        let d1 = base.invert((r1 - self.translate_x) / self.scale);
        TimeScale::from_ms(d0, d1, (r0, r1))
    }

    /// The transform centering a base-scale x position at the given zoom
    ///
    /// Equivalent to `translate(width/2, 0) . scale(k) . translate(-x, 0)`.
    pub fn centered_on(width: f32, k: f32, x: f32) -> Self {
        Transform {
            translate_x: width / 2.0 - k * x,
            translate_y: 0.0,
            scale: k,
        }
    }

    /// Zoom by a factor about a fixed pixel pivot
    ///
    /// The base-scale point under the pivot stays put on screen.
    pub fn zoomed_about(&self, factor: f32, pivot_x: f32, min: f32, max: f32) -> Self {
        let new_scale = (self.scale * factor).clamp(min, max);
        let ratio = new_scale / self.scale;
        Transform {
            translate_x: pivot_x - (pivot_x - self.translate_x) * ratio,
            translate_y: self.translate_y,
            scale: new_scale,
        }
    }

    /// Translate by a screen-space delta
    pub fn panned_by(&self, dx: f32, dy: f32) -> Self {
        Transform {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            scale: self.scale,
        }
    }

    /// Linear interpolation between two transforms
    pub fn lerp(a: &Transform, b: &Transform, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Transform {
            translate_x: a.translate_x + (b.translate_x - a.translate_x) * t,
            translate_y: a.translate_y + (b.translate_y - a.translate_y) * t,
            scale: a.scale + (b.scale - a.scale) * t,
        }
    }
}

/// Wrap a tick label to a maximum pixel width, breaking on word boundaries
///
/// `measure` returns the rendered width of a candidate line; tests supply a
/// synthetic measure so wrapping stays headless. A single word wider than
/// `max_width` is kept on its own line rather than split mid-word.
pub fn wrap_text(label: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure(&candidate) > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scale_1h() -> TimeScale {
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 4, 1, 11, 0, 0).unwrap();
        TimeScale::new(start, end, (15.0, 785.0))
    }

    #[test]
    fn test_time_scale_endpoints() {
        let scale = scale_1h();
        let (d0, d1) = scale.domain_ms();
        assert_eq!(scale.map_ms(d0), 15.0);
        assert_eq!(scale.map_ms(d1), 785.0);
    }

    #[test]
    fn test_time_scale_invert_roundtrip() {
        let scale = scale_1h();
        let (d0, d1) = scale.domain_ms();
        let mid = (d0 + d1) / 2.0;
        let px = scale.map_ms(mid);
        assert!((scale.invert(px) - mid).abs() < 1.0);
    }

    #[test]
    fn test_time_scale_set_range_keeps_domain() {
        let mut scale = scale_1h();
        let domain = scale.domain_ms();
        scale.set_range((15.0, 1185.0));
        assert_eq!(scale.domain_ms(), domain);
        assert_eq!(scale.map_ms(domain.1), 1185.0);
    }

    #[test]
    fn test_ticks_are_within_domain_and_ordered() {
        let scale = scale_1h();
        let ticks = scale.ticks(6);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= 8);
        let (r0, r1) = scale.range();
        for pair in ticks.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
        for tick in &ticks {
            assert!(tick.x >= r0 - 0.5 && tick.x <= r1 + 0.5);
            assert!(!tick.label.is_empty());
        }
    }

    #[test]
    fn test_tick_label_format() {
        let scale = scale_1h();
        let ticks = scale.ticks(6);
        // %m-%d %H:%M -> e.g. "04-01 10:15"
        assert!(ticks[0].label.starts_with("04-01 "));
    }

    #[test]
    fn test_band_scale_layout() {
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let band = BandScale::new(ids, (0.0, 350.0));

        // step = 350 / (3 + 0.5) = 100, bandwidth = 50
        assert!((band.bandwidth() - 50.0).abs() < 0.01);
        let a = band.position("a").unwrap();
        let b = band.position("b").unwrap();
        assert!((b - a - 100.0).abs() < 0.01);
        assert!(band.position("missing").is_none());
    }

    #[test]
    fn test_band_scale_gap_equals_bandwidth() {
        let ids: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let band = BandScale::new(ids, (0.0, 500.0));
        let step = band.position("1").unwrap() - band.position("0").unwrap();
        assert!((step - 2.0 * band.bandwidth()).abs() < 0.01);
    }

    #[test]
    fn test_transform_rescale_matches_apply() {
        let base = scale_1h();
        let transform = Transform {
            translate_x: 120.0,
            translate_y: 0.0,
            scale: 2.0,
        };
        let rescaled = transform.rescale(&base);

        let (d0, d1) = base.domain_ms();
        for f in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let ms = d0 + (d1 - d0) * f;
            let expected = transform.apply_x(base.map_ms(ms));
            assert!((rescaled.map_ms(ms) - expected).abs() < 0.1);
        }
    }

    #[test]
    fn test_transform_zoom_about_keeps_pivot_fixed() {
        let t = Transform {
            translate_x: -40.0,
            translate_y: 0.0,
            scale: 1.5,
        };
        let pivot = 321.0;
        let zoomed = t.zoomed_about(1.3, pivot, 0.1, 5.0);

        // The base point currently under the pivot must stay under it
        let base_x = (pivot - t.translate_x) / t.scale;
        assert!((zoomed.apply_x(base_x) - pivot).abs() < 0.01);
    }

    #[test]
    fn test_transform_scale_clamped() {
        let t = Transform::IDENTITY;
        let zoomed = t.zoomed_about(100.0, 0.0, 0.1, 5.0);
        assert_eq!(zoomed.scale, 5.0);
        let shrunk = t.zoomed_about(0.0001, 0.0, 0.1, 5.0);
        assert_eq!(shrunk.scale, 0.1);
    }

    #[test]
    fn test_transform_centered_on() {
        let t = Transform::centered_on(800.0, 2.0, 300.0);
        // The target base x lands at the viewport center at 2x
        assert!((t.apply_x(300.0) - 400.0).abs() < 0.01);
        assert_eq!(t.scale, 2.0);
    }

    #[test]
    fn test_transform_lerp_endpoints() {
        let a = Transform::IDENTITY;
        let b = Transform {
            translate_x: 100.0,
            translate_y: 0.0,
            scale: 2.0,
        };
        assert_eq!(Transform::lerp(&a, &b, 0.0), a);
        assert_eq!(Transform::lerp(&a, &b, 1.0), b);
        let mid = Transform::lerp(&a, &b, 0.5);
        assert!((mid.translate_x - 50.0).abs() < 0.01);
        assert!((mid.scale - 1.5).abs() < 0.01);
    }

    #[test]
    fn test_wrap_text_breaks_on_word_boundaries() {
        // 10px per word, 1px per space
        let measure = |s: &str| s.split(' ').count() as f32 * 10.0;
        let lines = wrap_text("04-01 10:15", 15.0, measure);
        assert_eq!(lines, vec!["04-01".to_string(), "10:15".to_string()]);
    }

    #[test]
    fn test_wrap_text_keeps_short_label_whole() {
        let measure = |s: &str| s.len() as f32;
        let lines = wrap_text("10:15", 30.0, measure);
        assert_eq!(lines, vec!["10:15".to_string()]);
    }

    #[test]
    fn test_wrap_text_overlong_word_kept_whole() {
        let measure = |s: &str| s.len() as f32 * 10.0;
        let lines = wrap_text("unbreakable", 30.0, measure);
        assert_eq!(lines, vec!["unbreakable".to_string()]);
    }
}
