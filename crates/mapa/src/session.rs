//! Event-driven shell around a mind map: owns the tree, routes pointer input, sequences layout
//! and auto-fit across frames, and applies dialog edits.

use crate::config::MapConfig;
use crate::dialog::{EditDialog, SaveRequest};
use mapa_core::{MindTree, NodeKind};
use mapa_layout::{Point, TreeLayout, layout_tree};
use mapa_render::{
    DeterministicTextMeasurer, Scene, SvgRenderOptions, TextMeasurer, Transform,
    ViewportController, ViewportSize, WheelDeltaMode, render_svg,
};
use std::sync::Arc;
use std::time::Duration;

/// Payload of a node click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClick {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
enum Pointer {
    Idle,
    /// Pressed on a card; becomes a click if released over the same card.
    Pressed { card: String },
    Panning { last: Point },
}

pub struct MapSession {
    tree: MindTree,
    config: MapConfig,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    viewport: ViewportController,
    dialog: EditDialog,
    layout: Option<TreeLayout>,
    scene: Scene,
    dirty: bool,
    pending_fit: bool,
    pointer: Pointer,
}

impl Default for MapSession {
    fn default() -> Self {
        Self::new(mapa_core::seed::strategic_manual(), MapConfig::default())
    }
}

impl MapSession {
    pub fn new(tree: MindTree, config: MapConfig) -> Self {
        Self {
            tree,
            viewport: ViewportController::new(config.viewport),
            config,
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            dialog: EditDialog::new(),
            layout: None,
            scene: Scene::default(),
            dirty: true,
            pending_fit: false,
            pointer: Pointer::Idle,
        }
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self.dirty = true;
        self
    }

    pub fn tree(&self) -> &MindTree {
        &self.tree
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn dialog(&self) -> &EditDialog {
        &self.dialog
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Last computed layout; `None` until the first layout pass.
    pub fn layout(&self) -> Option<&TreeLayout> {
        self.layout.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn size(&self) -> ViewportSize {
        self.viewport.size()
    }

    /// True when a layout pass is due on the next non-empty frame.
    pub fn needs_layout(&self) -> bool {
        self.dirty
    }

    pub fn fit_pending(&self) -> bool {
        self.pending_fit
    }

    /// Nothing left to do: no layout due, no fit pending, no animation running.
    pub fn is_settled(&self, now: Duration) -> bool {
        !self.dirty && !self.pending_fit && !self.viewport.is_animating(now)
    }

    /// Replaces the tree. An identical tree (same allocation) does not trigger a relayout.
    pub fn set_tree(&mut self, tree: MindTree) {
        if tree.ptr_eq(&self.tree) {
            return;
        }
        self.tree = tree;
        self.dirty = true;
    }

    pub fn resize(&mut self, size: ViewportSize) {
        if size == self.viewport.size() {
            return;
        }
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
        self.viewport.set_size(size);
        self.dirty = true;
    }

    /// Runs one frame of the event loop.
    ///
    /// A fit scheduled by the previous frame's layout pass runs first; then, if the data or size
    /// changed, the layout and scene are rebuilt and a fit is scheduled for the next frame.
    /// Returns the transform to draw with.
    pub fn frame(&mut self, now: Duration) -> Transform {
        if self.pending_fit {
            self.pending_fit = false;
            match self.scene.content_bounds() {
                Some(bounds) => {
                    self.viewport.fit_to_content(&bounds, now);
                }
                None => tracing::debug!("auto-fit skipped: empty scene"),
            }
        }

        if self.dirty {
            if self.viewport.size().is_empty() {
                tracing::debug!("layout deferred: viewport has no size");
            } else {
                self.relayout();
                self.pending_fit = true;
            }
        }

        self.viewport.tick(now)
    }

    fn relayout(&mut self) {
        let layout = layout_tree(&self.tree, &self.config.layout);
        self.scene = Scene::build(
            &layout,
            &self.config.layout,
            &self.config.theme,
            self.measurer.as_ref(),
        );
        self.layout = Some(layout);
        self.dirty = false;
    }

    pub fn transform(&self, now: Duration) -> Transform {
        self.viewport.transform_at(now)
    }

    /// Card under a screen point.
    pub fn card_at(&self, screen: Point, now: Duration) -> Option<&str> {
        let content = self.transform(now).invert(screen);
        self.scene.hit_test(content).map(|c| c.id.as_str())
    }

    pub fn pointer_down(&mut self, screen: Point, now: Duration) {
        if self.dialog.is_open() {
            return;
        }
        let hit = self.card_at(screen, now).map(str::to_string);
        self.pointer = match hit {
            Some(card) => Pointer::Pressed { card },
            None => {
                self.viewport.pan_by(0.0, 0.0, now);
                Pointer::Panning { last: screen }
            }
        };
    }

    pub fn pointer_move(&mut self, screen: Point, now: Duration) {
        if self.dialog.is_open() {
            return;
        }
        if let Pointer::Panning { last } = &mut self.pointer {
            let (dx, dy) = (screen.x - last.x, screen.y - last.y);
            *last = screen;
            self.viewport.pan_by(dx, dy, now);
        }
    }

    /// Ends a press. Releasing over the card that was pressed clicks it and opens the dialog.
    pub fn pointer_up(&mut self, screen: Point, now: Duration) -> Option<NodeClick> {
        if self.dialog.is_open() {
            self.pointer = Pointer::Idle;
            return None;
        }
        let Pointer::Pressed { card } = std::mem::replace(&mut self.pointer, Pointer::Idle) else {
            return None;
        };
        if self.card_at(screen, now) != Some(card.as_str()) {
            return None;
        }
        self.click_node(&card)
    }

    pub fn pointer_cancel(&mut self) {
        self.pointer = Pointer::Idle;
    }

    /// Opens the dialog for `id` as if its card had been clicked.
    pub fn click_node(&mut self, id: &str) -> Option<NodeClick> {
        let node = self.tree.find(id)?;
        let click = NodeClick {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
        };
        tracing::debug!(id, "node clicked");
        self.dialog.open(&click.id, &click.name, click.kind);
        Some(click)
    }

    pub fn wheel(&mut self, screen: Point, delta_y: f64, mode: WheelDeltaMode, now: Duration) {
        if self.dialog.is_open() {
            return;
        }
        self.viewport.wheel(screen, delta_y, mode, now);
    }

    pub fn pinch(&mut self, center: Point, factor: f64, pan: Point, now: Duration) {
        if self.dialog.is_open() {
            return;
        }
        self.viewport.pinch(center, factor, pan, now);
    }

    pub fn zoom_in(&mut self, now: Duration) {
        self.viewport.zoom_in(now);
    }

    pub fn zoom_out(&mut self, now: Duration) {
        self.viewport.zoom_out(now);
    }

    /// The fit button. Returns false when there is nothing to fit.
    pub fn fit(&mut self, now: Duration) -> bool {
        match self.scene.content_bounds() {
            Some(bounds) => self.viewport.fit_to_content(&bounds, now),
            None => false,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        self.dialog.set_draft(text)
    }

    pub fn cancel_edit(&mut self) {
        self.dialog.cancel();
    }

    /// Confirms the dialog and applies the edit to the tree.
    pub fn save_edit(&mut self) -> Option<SaveRequest> {
        let request = self.dialog.save()?;
        self.apply_save(&request);
        Some(request)
    }

    /// Renames the node. Unknown ids leave the tree untouched.
    pub fn apply_save(&mut self, request: &SaveRequest) {
        let next = self.tree.with_node_name(&request.node_id, &request.text);
        self.set_tree(next);
    }

    pub fn render_svg(&self, now: Duration, options: &SvgRenderOptions) -> String {
        render_svg(
            &self.scene,
            &self.transform(now),
            self.viewport.size(),
            &self.config.theme,
            options,
        )
    }
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("nodes", &self.tree.len())
            .field("size", &self.viewport.size())
            .field("dirty", &self.dirty)
            .field("pending_fit", &self.pending_fit)
            .field("dialog", self.dialog.state())
            .finish_non_exhaustive()
    }
}
