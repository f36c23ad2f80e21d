#![forbid(unsafe_code)]

//! Headless rendering for mapa mind maps: a retained card/link scene, a pan/zoom viewport with
//! d3-zoom style transitions, and SVG output.

pub mod scene;
pub mod svg;
pub mod text;
pub mod theme;
pub mod viewport;

pub use scene::{Card, Link, Scene};
pub use svg::{SvgRenderOptions, render_svg};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
pub use theme::{CardStyle, Theme};
pub use viewport::{Transform, ViewportConfig, ViewportController, ViewportSize, WheelDeltaMode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown theme: {name} (expected one of: indigo, slate)")]
    UnknownTheme { name: String },
    #[error("theme JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
