//! Smooth zoom interpolation (van Wijk and Nuij, "Smooth and efficient zooming and panning").

use std::f64::consts::SQRT_2;

const RHO: f64 = SQRT_2;
const EPSILON2: f64 = 1e-12;

/// A view is `[center_x, center_y, visible_width]` in content coordinates.
pub type View = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Path {
    /// Centers coincide: a pure exponential zoom.
    Scale { s: f64 },
    Arc { d1: f64, r0: f64, s: f64 },
}

/// Interpolates between two views along the optimal zoom/pan path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomInterpolator {
    a: View,
    b: View,
    path: Path,
}

pub fn interpolate_zoom(a: View, b: View) -> ZoomInterpolator {
    let (ux0, uy0, w0) = (a[0], a[1], a[2]);
    let (ux1, uy1, w1) = (b[0], b[1], b[2]);
    let (dx, dy) = (ux1 - ux0, uy1 - uy0);
    let d2 = dx * dx + dy * dy;
    let rho2 = RHO * RHO;
    let rho4 = rho2 * rho2;

    let path = if d2 < EPSILON2 {
        Path::Scale {
            s: (w1 / w0).ln() / RHO,
        }
    } else {
        let d1 = d2.sqrt();
        let b0 = (w1 * w1 - w0 * w0 + rho4 * d2) / (2.0 * w0 * rho2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - rho4 * d2) / (2.0 * w1 * rho2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
        Path::Arc {
            d1,
            r0,
            s: (r1 - r0) / RHO,
        }
    };
    ZoomInterpolator { a, b, path }
}

impl ZoomInterpolator {
    pub fn sample(&self, t: f64) -> View {
        let [ux0, uy0, w0] = self.a;
        let (dx, dy) = (self.b[0] - ux0, self.b[1] - uy0);
        match self.path {
            Path::Scale { s } => [ux0 + t * dx, uy0 + t * dy, w0 * (RHO * t * s).exp()],
            Path::Arc { d1, r0, s } => {
                let st = t * s;
                let coshr0 = r0.cosh();
                let u = w0 / (RHO * RHO * d1) * (coshr0 * (RHO * st + r0).tanh() - r0.sinh());
                [ux0 + u * dx, uy0 + u * dy, w0 * coshr0 / (RHO * st + r0).cosh()]
            }
        }
    }
}

/// d3's default transition easing.
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
