#![forbid(unsafe_code)]

//! `mapa` is a headless, interactive mind map.
//!
//! A [`MindTree`] is laid out as a left-to-right tidy tree, drawn as a scene of cards and curved
//! links, and viewed through a pan/zoom viewport. [`MapSession`] ties these together with a modal
//! label editor and frame-based sequencing (layout, then auto-fit on the following frame).
//!
//! # Features
//!
//! - `raster`: PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub mod config;
pub mod dialog;
#[cfg(feature = "raster")]
pub mod raster;
pub mod session;

pub use config::MapConfig;
pub use dialog::{DialogState, EditDialog, SaveRequest, kind_label};
pub use mapa_core::{MindTree, NodeKind, TreeNode, seed};
pub use mapa_layout::{Bounds, LayoutConfig, Point, TreeLayout, layout_tree};
pub use mapa_render::{
    DeterministicTextMeasurer, Scene, SvgRenderOptions, TextMeasurer, Theme, Transform,
    ViewportConfig, ViewportController, ViewportSize, WheelDeltaMode,
};
pub use session::{MapSession, NodeClick};

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Tree(#[from] mapa_core::Error),
    #[error(transparent)]
    Render(#[from] mapa_render::Error),
    #[error("invalid configuration JSON: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Drives `session` on a virtual clock starting at `start` until layout, auto-fit and any
/// animation have finished. Returns the time at which it settled.
pub fn settle(session: &mut MapSession, start: Duration) -> Duration {
    const FRAME: Duration = Duration::from_millis(16);
    // Bounded so an empty viewport (which never lays out) cannot spin forever.
    const MAX_FRAMES: u32 = 1_000;

    let mut now = start;
    for _ in 0..MAX_FRAMES {
        session.frame(now);
        if session.is_settled(now) || session.size().is_empty() {
            break;
        }
        now += FRAME;
    }
    now
}

/// One-shot render: lays out `tree`, fits it into a `size` viewport and returns the SVG.
pub fn render_fitted_svg(
    tree: MindTree,
    config: MapConfig,
    size: ViewportSize,
    options: &SvgRenderOptions,
) -> String {
    let mut session = MapSession::new(tree, config);
    session.resize(size);
    let now = settle(&mut session, Duration::ZERO);
    session.render_svg(now, options)
}
