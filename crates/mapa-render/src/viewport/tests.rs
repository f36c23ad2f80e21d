use super::*;

const EPS: f64 = 1e-9;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn controller() -> ViewportController {
    let mut vp = ViewportController::default();
    vp.set_size(ViewportSize::new(1000.0, 800.0));
    vp
}

fn assert_transform(actual: Transform, expected: Transform) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6
            && (actual.y - expected.y).abs() < 1e-6
            && (actual.k - expected.k).abs() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn zoom_in_animates_around_the_viewport_center() {
    let mut vp = controller();
    vp.zoom_in(ms(1000));

    assert_transform(vp.transform_at(ms(1000)), Transform::IDENTITY);
    assert!(vp.is_animating(ms(1150)));

    let mid = vp.transform_at(ms(1150));
    assert!(mid.k > 1.0 && mid.k < 1.3, "{mid:?}");
    let center = Point::new(500.0, 400.0);
    let c = mid.invert(center);
    assert!((c.x - 500.0).abs() < 1e-6 && (c.y - 400.0).abs() < 1e-6);

    assert_eq!(vp.tick(ms(1300)), Transform::new(-150.0, -120.0, 1.3));
    assert!(!vp.is_animating(ms(1300)));
}

#[test]
fn zoom_steps_are_clamped_to_the_scale_extent() {
    let mut vp = controller();
    for i in 0..40 {
        vp.zoom_in(ms(i * 1000));
    }
    assert!((vp.tick(ms(50_000)).k - 3.0).abs() < EPS);

    for i in 0..60 {
        vp.zoom_out(ms(60_000 + i * 1000));
    }
    assert!((vp.tick(ms(200_000)).k - 0.05).abs() < EPS);
}

#[test]
fn zoom_out_is_the_reciprocal_step() {
    let mut vp = controller();
    vp.zoom_out(Duration::ZERO);
    let t = vp.tick(ms(300));
    assert!((t.k - 1.0 / 1.3).abs() < EPS);
}

#[test]
fn zoom_in_then_out_without_waiting_restores_the_view() {
    let mut vp = controller();
    vp.zoom_in(ms(0));
    vp.zoom_out(ms(0));
    assert_transform(vp.tick(ms(1000)), Transform::IDENTITY);
}

#[test]
fn zoom_out_mid_animation_returns_to_the_starting_scale() {
    let mut vp = controller();
    vp.zoom_in(ms(0));
    vp.zoom_out(ms(100));
    assert!(vp.is_animating(ms(200)));
    assert_transform(vp.tick(ms(1000)), Transform::IDENTITY);
}

#[test]
fn rapid_zoom_steps_compound() {
    let mut vp = controller();
    vp.zoom_in(ms(0));
    vp.zoom_in(ms(50));
    vp.zoom_in(ms(100));
    let t = vp.tick(ms(1000));
    assert!((t.k - 1.3f64.powi(3)).abs() < EPS, "{t:?}");
    let c = t.invert(Point::new(500.0, 400.0));
    assert!((c.x - 500.0).abs() < 1e-6 && (c.y - 400.0).abs() < 1e-6);
}

#[test]
fn invalid_sizing_falls_back_to_defaults() {
    let cfg: ViewportConfig = serde_json::from_str(
        r#"{ "scaleMin": 0, "fitMinScale": 0, "zoomStepFactor": -2, "fitPadding": -5 }"#,
    )
    .unwrap();
    let clean = cfg.sanitized();
    let d = ViewportConfig::default();
    assert_eq!(clean.scale_min, d.scale_min);
    assert_eq!(clean.fit_min_scale, d.fit_min_scale);
    assert_eq!(clean.zoom_step_factor, d.zoom_step_factor);
    assert_eq!(clean.fit_padding, d.fit_padding);

    let inverted = ViewportConfig {
        scale_min: 5.0,
        scale_max: 2.0,
        ..d
    }
    .sanitized();
    assert_eq!((inverted.scale_min, inverted.scale_max), (d.scale_min, d.scale_max));

    let kept = ViewportConfig {
        scale_min: 0.5,
        fit_padding: 0.0,
        ..d
    };
    assert_eq!(kept.sanitized(), kept);
}

#[test]
fn fit_stays_finite_with_a_zero_min_scale_config() {
    let cfg: ViewportConfig =
        serde_json::from_str(r#"{ "fitMinScale": 0, "scaleMin": 0 }"#).unwrap();
    let mut vp = ViewportController::new(cfg);
    vp.set_size(ViewportSize::new(120.0, 120.0));
    assert_eq!(vp.config().fit_min_scale, 0.1);

    let bounds = Bounds::from_rect(0.0, 0.0, 1000.0, 1000.0);
    let target = vp.fit_transform(&bounds).unwrap();
    assert!((target.k - 0.1).abs() < EPS);

    assert!(vp.fit_to_content(&bounds, ms(0)));
    for t in [100, 375, 600, 750] {
        let sample = vp.transform_at(ms(t));
        assert!(
            sample.x.is_finite() && sample.y.is_finite() && sample.k > 0.0,
            "{sample:?}"
        );
        let p = sample.invert(Point::new(60.0, 60.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn fit_centers_content_with_padding_and_max_scale() {
    let mut vp = controller();
    let bounds = Bounds::from_rect(0.0, -100.0, 400.0, 200.0);
    assert_eq!(
        vp.fit_transform(&bounds),
        Some(Transform::new(260.0, 400.0, 1.2))
    );

    assert!(vp.fit_to_content(&bounds, ms(0)));
    assert!(vp.is_animating(ms(700)));
    let end = vp.tick(ms(750));
    assert_eq!(end, Transform::new(260.0, 400.0, 1.2));
    let mid = end.apply(bounds.center());
    assert!((mid.x - 500.0).abs() < EPS && (mid.y - 400.0).abs() < EPS);
}

#[test]
fn fit_uses_the_tighter_axis_and_min_scale() {
    let vp = controller();
    let wide = Bounds::from_rect(0.0, 0.0, 8400.0, 100.0);
    assert!((vp.fit_transform(&wide).unwrap().k - 0.1).abs() < EPS);

    let medium = Bounds::from_rect(0.0, 0.0, 1680.0, 320.0);
    assert!((vp.fit_transform(&medium).unwrap().k - 0.5).abs() < EPS);
}

#[test]
fn fit_is_a_no_op_for_degenerate_bounds_or_empty_viewport() {
    let mut vp = controller();
    vp.set_transform(Transform::new(10.0, 20.0, 0.5));
    let before = vp.transform_at(ms(0));

    assert!(!vp.fit_to_content(&Bounds::from_rect(0.0, 0.0, 0.0, 50.0), ms(0)));
    assert!(!vp.fit_to_content(&Bounds::from_rect(0.0, 0.0, f64::INFINITY, 50.0), ms(0)));
    assert_eq!(vp.transform_at(ms(10)), before);

    let mut empty = ViewportController::default();
    assert!(!empty.fit_to_content(&Bounds::from_rect(0.0, 0.0, 100.0, 100.0), ms(0)));
    assert_eq!(empty.transform_at(ms(0)), Transform::IDENTITY);
}

#[test]
fn pan_interrupts_a_running_transition() {
    let mut vp = controller();
    vp.zoom_in(ms(0));
    let sampled = vp.transform_at(ms(150));
    vp.pan_by(25.0, -10.0, ms(150));

    assert!(!vp.is_animating(ms(150)));
    assert_transform(
        vp.transform_at(ms(400)),
        Transform::new(sampled.x + 25.0, sampled.y - 10.0, sampled.k),
    );
}

#[test]
fn wheel_zoom_keeps_the_pointer_fixed() {
    let mut vp = controller();
    let pointer = Point::new(200.0, 300.0);
    let before = vp.transform_at(ms(0)).invert(pointer);
    vp.wheel(pointer, -100.0, WheelDeltaMode::Pixel, ms(0));
    let t = vp.transform_at(ms(0));
    assert!((t.k - 2f64.powf(0.2)).abs() < EPS);
    let after = t.invert(pointer);
    assert!((after.x - before.x).abs() < 1e-9 && (after.y - before.y).abs() < 1e-9);

    vp.wheel(pointer, 3.0, WheelDeltaMode::Line, ms(0));
    assert!((vp.transform_at(ms(0)).k - 2f64.powf(0.2 - 0.15)).abs() < EPS);

    vp.wheel(pointer, 100.0, WheelDeltaMode::Page, ms(0));
    assert!((vp.transform_at(ms(0)).k - 0.05).abs() < EPS);
}

#[test]
fn overflowing_wheel_deltas_land_on_the_matching_bound() {
    let mut vp = controller();
    let center = Point::new(500.0, 400.0);
    vp.wheel(center, -5000.0, WheelDeltaMode::Page, ms(0));
    assert_eq!(vp.transform_at(ms(0)).k, 3.0);

    vp.wheel(center, 5000.0, WheelDeltaMode::Page, ms(0));
    assert_eq!(vp.transform_at(ms(0)).k, 0.05);
}

#[test]
fn scale_clamp_sends_infinities_to_bounds_and_keeps_nan_out() {
    let cfg = ViewportConfig::default();
    assert_eq!(cfg.clamp_scale(f64::INFINITY, 1.0), 3.0);
    assert_eq!(cfg.clamp_scale(f64::NEG_INFINITY, 1.0), 0.05);
    assert_eq!(cfg.clamp_scale(f64::NAN, 1.5), 1.5);
    assert_eq!(cfg.clamp_scale(0.5, 1.0), 0.5);
}

#[test]
fn pinch_scales_around_its_center_and_pans() {
    let mut vp = controller();
    vp.pinch(Point::new(100.0, 100.0), 2.0, Point::new(5.0, 0.0), ms(0));
    assert_eq!(vp.transform_at(ms(0)), Transform::new(-95.0, -100.0, 2.0));
    vp.pinch(Point::new(0.0, 0.0), f64::NAN, Point::default(), ms(0));
    assert_eq!(vp.transform_at(ms(0)).k, 2.0);
}

#[test]
fn zoom_path_hits_both_endpoints() {
    let a = [0.0, 0.0, 1000.0];
    let b = [300.0, -200.0, 400.0];
    let i = interpolate_zoom(a, b);
    let start = i.sample(0.0);
    let end = i.sample(1.0);
    for n in 0..3 {
        assert!((start[n] - a[n]).abs() < 1e-9);
        assert!((end[n] - b[n]).abs() < 1e-6, "{end:?}");
    }

    let scale_only = interpolate_zoom([5.0, 5.0, 100.0], [5.0, 5.0, 50.0]);
    let half = scale_only.sample(0.5);
    assert!((half[2] - (100.0f64 * 50.0).sqrt()).abs() < 1e-9);
}

#[test]
fn cubic_in_out_is_symmetric() {
    assert_eq!(cubic_in_out(0.0), 0.0);
    assert_eq!(cubic_in_out(0.5), 0.5);
    assert_eq!(cubic_in_out(1.0), 1.0);
    assert!((cubic_in_out(0.25) + cubic_in_out(0.75) - 1.0).abs() < EPS);
}

#[test]
fn transform_maps_content_to_screen() {
    let t = Transform::new(10.0, 20.0, 2.0);
    assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 22.0));
    assert_eq!(t.invert(Point::new(12.0, 22.0)), Point::new(1.0, 1.0));
    assert_eq!(t.to_svg(), "translate(10,20) scale(2)");
}
