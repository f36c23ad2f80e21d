//! Pan/zoom state layered over the scene.
//!
//! A [`Transform`] maps a content point `p` to the screen point `p * k + (x, y)`. Programmatic
//! changes (zoom buttons, fit) animate; gestures apply immediately and interrupt any animation.
//! Time is always passed in by the caller.

mod transition;

#[cfg(test)]
mod tests;

pub use transition::{View, ZoomInterpolator, cubic_in_out, interpolate_zoom};

use mapa_layout::{Bounds, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub scale_min: f64,
    pub scale_max: f64,
    pub zoom_step_factor: f64,
    pub zoom_duration_ms: u64,
    pub fit_padding: f64,
    pub fit_min_scale: f64,
    pub fit_max_scale: f64,
    pub fit_duration_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            scale_min: 0.05,
            scale_max: 3.0,
            zoom_step_factor: 1.3,
            zoom_duration_ms: 300,
            fit_padding: 80.0,
            fit_min_scale: 0.1,
            fit_max_scale: 1.2,
            fit_duration_ms: 750,
        }
    }
}

impl ViewportConfig {
    /// Replaces values that would produce a zero, negative or non-finite scale with defaults.
    /// Inverted extents fall back as a pair.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        fn positive(v: f64, fallback: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { fallback }
        }
        fn extent(lo: f64, hi: f64, d_lo: f64, d_hi: f64) -> (f64, f64) {
            let (lo, hi) = (positive(lo, d_lo), positive(hi, d_hi));
            if lo <= hi { (lo, hi) } else { (d_lo, d_hi) }
        }
        let (scale_min, scale_max) =
            extent(self.scale_min, self.scale_max, d.scale_min, d.scale_max);
        let (fit_min_scale, fit_max_scale) =
            extent(self.fit_min_scale, self.fit_max_scale, d.fit_min_scale, d.fit_max_scale);
        Self {
            scale_min,
            scale_max,
            zoom_step_factor: positive(self.zoom_step_factor, d.zoom_step_factor),
            zoom_duration_ms: self.zoom_duration_ms,
            fit_padding: if self.fit_padding.is_finite() && self.fit_padding >= 0.0 {
                self.fit_padding
            } else {
                d.fit_padding
            },
            fit_min_scale,
            fit_max_scale,
            fit_duration_ms: self.fit_duration_ms,
        }
    }

    /// Clamps `k` to the scale extent. Infinities land on the matching bound; NaN keeps `current`.
    pub fn clamp_scale(&self, k: f64, current: f64) -> f64 {
        let k = if k.is_nan() { current } else { k };
        k.clamp(self.scale_min, self.scale_max.max(self.scale_min))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Content → screen.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Screen → content.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + self.k * dx, self.y + self.k * dy, self.k)
    }

    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.x, self.y, self.k * k)
    }

    /// Same scale change as `scale`, but keeps the content under the screen point `anchor` fixed.
    pub fn scale_at(&self, k: f64, anchor: Point) -> Self {
        let c = self.invert(anchor);
        Self::new(anchor.x - c.x * k, anchor.y - c.y * k, k)
    }

    pub fn to_svg(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            crate::svg::fmt(self.x),
            crate::svg::fmt(self.y),
            crate::svg::fmt(self.k)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// How a wheel delta is expressed (DOM `deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelDeltaMode {
    fn factor(self) -> f64 {
        match self {
            WheelDeltaMode::Pixel => 0.002,
            WheelDeltaMode::Line => 0.05,
            WheelDeltaMode::Page => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    start: Duration,
    duration: Duration,
    end: Transform,
    anchor: Point,
    width: f64,
    path: ZoomInterpolator,
}

impl Transition {
    fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn sample(&self, now: Duration) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.end;
        }
        let view = self.path.sample(cubic_in_out(t));
        let k = self.width / view[2];
        Transform::new(self.anchor.x - view[0] * k, self.anchor.y - view[1] * k, k)
    }
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    size: ViewportSize,
    current: Transform,
    transition: Option<Transition>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config: config.sanitized(),
            size: ViewportSize::default(),
            current: Transform::IDENTITY,
            transition: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn set_size(&mut self, size: ViewportSize) {
        self.size = size;
    }

    /// The transform as of `now`, mid-animation included.
    pub fn transform_at(&self, now: Duration) -> Transform {
        match &self.transition {
            Some(t) => t.sample(now),
            None => self.current,
        }
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.transition.is_some_and(|t| t.progress(now) < 1.0)
    }

    /// Advances to `now`, retiring a finished animation.
    pub fn tick(&mut self, now: Duration) -> Transform {
        let t = self.transform_at(now);
        if !self.is_animating(now) {
            self.current = t;
            self.transition = None;
        }
        t
    }

    /// Jumps to `transform` without animation. The scale is clamped.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transition = None;
        self.current = Transform {
            k: self.config.clamp_scale(transform.k, self.current.k),
            ..transform
        };
    }

    pub fn zoom_in(&mut self, now: Duration) {
        self.zoom_by(self.config.zoom_step_factor, now);
    }

    pub fn zoom_out(&mut self, now: Duration) {
        self.zoom_by(1.0 / self.config.zoom_step_factor, now);
    }

    /// Multiplies the scale by `factor`, anchored at the viewport center, animated.
    ///
    /// While a transition runs, the step applies to its end transform, so steps issued in quick
    /// succession compound exactly.
    pub fn zoom_by(&mut self, factor: f64, now: Duration) {
        let from = self.transition.map_or(self.current, |t| t.end);
        let k = self.config.clamp_scale(from.k * factor, from.k);
        let target = from.scale_at(k, self.size.center());
        tracing::debug!(from = from.k, to = k, "zoom step");
        let duration = Duration::from_millis(self.config.zoom_duration_ms);
        self.animate_to(target, now, duration);
    }

    /// Transform that centers `bounds` in the viewport with the configured padding and clamps.
    ///
    /// `None` for degenerate bounds or an empty viewport.
    pub fn fit_transform(&self, bounds: &Bounds) -> Option<Transform> {
        if bounds.is_degenerate() || self.size.is_empty() {
            return None;
        }
        let pad = self.config.fit_padding;
        let sx = (self.size.width - pad * 2.0) / bounds.width();
        let sy = (self.size.height - pad * 2.0) / bounds.height();
        let lo = self.config.fit_min_scale;
        let hi = self.config.fit_max_scale.max(lo);
        let k = sx.min(sy).clamp(lo, hi);
        let c = bounds.center();
        Some(
            Transform::IDENTITY
                .translate(self.size.width / 2.0, self.size.height / 2.0)
                .scale(k)
                .translate(-c.x, -c.y),
        )
    }

    /// Starts an animated fit. Returns false (and leaves the transform alone) when nothing fits.
    pub fn fit_to_content(&mut self, bounds: &Bounds, now: Duration) -> bool {
        let Some(target) = self.fit_transform(bounds) else {
            tracing::debug!(?bounds, size = ?self.size, "fit skipped");
            return false;
        };
        let duration = Duration::from_millis(self.config.fit_duration_ms);
        self.animate_to(target, now, duration);
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64, now: Duration) {
        let t = self.interrupt(now);
        self.current = Transform::new(t.x + dx, t.y + dy, t.k);
    }

    /// Wheel zoom anchored at the pointer (screen coordinates).
    pub fn wheel(&mut self, pointer: Point, delta_y: f64, mode: WheelDeltaMode, now: Duration) {
        if !delta_y.is_finite() {
            return;
        }
        let t = self.interrupt(now);
        let k = self
            .config
            .clamp_scale(t.k * 2f64.powf(-delta_y * mode.factor()), t.k);
        self.current = t.scale_at(k, pointer);
    }

    /// Pinch zoom by `factor` around `center`, optionally panning by the centroid motion.
    pub fn pinch(&mut self, center: Point, factor: f64, pan: Point, now: Duration) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let t = self.interrupt(now);
        let k = self.config.clamp_scale(t.k * factor, t.k);
        let zoomed = t.scale_at(k, center);
        self.current = Transform::new(zoomed.x + pan.x, zoomed.y + pan.y, k);
    }

    fn interrupt(&mut self, now: Duration) -> Transform {
        let t = self.transform_at(now);
        self.transition = None;
        self.current = t;
        t
    }

    fn animate_to(&mut self, end: Transform, now: Duration, duration: Duration) {
        let start = self.interrupt(now);
        let anchor = self.size.center();
        let width = self.size.width.max(self.size.height);
        if duration.is_zero() || self.size.is_empty() || start == end {
            self.current = end;
            return;
        }
        let a = start.invert(anchor);
        let b = end.invert(anchor);
        let path = interpolate_zoom([a.x, a.y, width / start.k], [b.x, b.y, width / end.k]);
        self.transition = Some(Transition {
            start: now,
            duration,
            end,
            anchor,
            width,
            path,
        });
    }
}
