//! Property tests for the timeline chart engine
//!
//! Covers the scale/renderer/interaction contracts: endpoint mapping and
//! monotonicity, the minimum-width clamp, palette determinism, post-resize
//! extent containment and zoom-animation preemption.

use chaosdash_rs::chart::interaction::Interaction;
use chaosdash_rs::chart::render::{self, ColorPalette, PALETTE};
use chaosdash_rs::chart::scale::{TimeScale, Transform};
use chaosdash_rs::types::Event;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minute)
}

fn event(id: u64, uid: &str, start: i64, finish: Option<i64>) -> Event {
    Event {
        id,
        experiment: format!("exp-{}", uid),
        experiment_id: uid.to_string(),
        start_time: at(start),
        finish_time: finish.map(at),
    }
}

proptest! {
    /// mapTime hits the pixel range endpoints exactly and is monotonic
    /// non-decreasing between them.
    #[test]
    fn map_time_monotonic_with_exact_endpoints(
        domain_start in -1_000_000i64..1_000_000,
        domain_len in 1i64..1_000_000,
        left in 0.0f32..100.0,
        width in 200.0f32..2000.0,
        samples in proptest::collection::vec(0.0f64..=1.0, 2..20),
    ) {
        let d0 = domain_start as f64;
        let d1 = (domain_start + domain_len) as f64;
        let right = left + width;
        let scale = TimeScale::from_ms(d0, d1, (left, right));

        prop_assert!((scale.map_ms(d0) - left).abs() < 1e-3);
        prop_assert!((scale.map_ms(d1) - right).abs() < 1e-3);

        let mut sorted = samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let pixels: Vec<f32> = sorted
            .iter()
            .map(|f| scale.map_ms(d0 + f * (d1 - d0)))
            .collect();
        for pair in pixels.windows(2) {
            prop_assert!(pair[0] <= pair[1] + 1e-3);
        }
    }

    /// Rescaling through any legal transform keeps the mapping consistent
    /// with applying the transform to the base scale's output.
    #[test]
    fn rescale_is_transform_composition(
        translate_x in -2000.0f32..2000.0,
        scale_factor in 0.1f32..5.0,
        fraction in 0.0f64..=1.0,
    ) {
        let base = TimeScale::from_ms(0.0, 3_600_000.0, (15.0, 785.0));
        let transform = Transform { translate_x, translate_y: 0.0, scale: scale_factor };
        let rescaled = transform.rescale(&base);

        let ms = fraction * 3_600_000.0;
        let expected = transform.apply_x(base.map_ms(ms));
        prop_assert!((rescaled.map_ms(ms) - expected).abs() < 0.5);
    }

    /// Events inside the domain stay inside the pixel range after a resize
    /// rebuilds the base range.
    #[test]
    fn resized_range_contains_in_domain_events(
        starts in proptest::collection::vec(0i64..60, 1..30),
        new_width in 400.0f32..3000.0,
    ) {
        let (left, right_margin) = (15.0f32, 15.0f32);
        let mut scale = TimeScale::new(at(0), at(60), (left, 800.0 - right_margin));
        scale.set_range((left, new_width - right_margin));

        for (i, start) in starts.iter().enumerate() {
            let e = event(i as u64, "lane", *start, None);
            let x = scale.map(e.start_time);
            prop_assert!(x >= left - 1e-3);
            prop_assert!(x <= new_width - right_margin + 1e-3);
        }
    }
}

#[test]
fn zero_duration_event_renders_one_pixel_wide() {
    let scale = TimeScale::new(at(0), at(60), (15.0, 785.0));
    let e = event(1, "a", 30, Some(30));
    assert_eq!(render::rect_width(&scale, &e, at(60)), 1.0);
}

#[test]
fn just_started_event_renders_at_least_one_pixel() {
    let scale = TimeScale::new(at(0), at(60), (15.0, 785.0));
    let e = event(1, "a", 30, None);
    // "now" equals the start: zero elapsed time
    assert_eq!(render::rect_width(&scale, &e, at(30)), 1.0);
}

#[test]
fn palette_is_stable_within_one_chart_instance() {
    let events: Vec<Event> = (0..8)
        .map(|i| event(i, &format!("id-{}", i % 4), i as i64, None))
        .collect();
    let palette = ColorPalette::new(&events);

    for e in &events {
        assert_eq!(palette.color(&e.experiment_id), palette.color(&e.experiment_id));
    }
    // Distinct ids get distinct colors while the palette lasts
    let colors: Vec<_> = (0..4).map(|i| palette.color(&format!("id-{}", i))).collect();
    for i in 0..colors.len() {
        for j in (i + 1)..colors.len() {
            assert_ne!(colors[i], colors[j]);
        }
    }
}

#[test]
fn palette_collides_only_after_exhaustion() {
    let events: Vec<Event> = (0..PALETTE.len() as u64 + 1)
        .map(|i| event(i, &format!("id-{}", i), i as i64, None))
        .collect();
    let palette = ColorPalette::new(&events);
    assert_eq!(palette.color("id-0"), palette.color(&format!("id-{}", PALETTE.len())));
}

#[test]
fn second_zoom_request_wins_over_in_flight_animation() {
    let mut interaction = Interaction::new(0.1, 5.0, Duration::from_millis(750));
    let first = Transform::centered_on(800.0, 2.0, 300.0);
    let second = Transform::centered_on(800.0, 2.0, 120.0);

    let t0 = Instant::now();
    interaction.request_zoom(first, t0);
    interaction.tick(t0 + Duration::from_millis(200));
    assert!(interaction.is_animating());

    interaction.request_zoom(second, t0 + Duration::from_millis(200));
    interaction.tick(t0 + Duration::from_millis(2000));

    // No blended or queued outcome: exactly the second target
    assert_eq!(interaction.transform, second);
    assert!(!interaction.is_animating());
}
