//! Retained scene: one card per layout node and one curved link per layout edge.

use crate::text::{TextMeasurer, measure_wrapped};
use crate::theme::Theme;
use mapa_core::NodeKind;
use mapa_layout::{Bounds, LayoutConfig, Point, TreeLayout};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Top-left corner in content coordinates.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lines: Vec<String>,
    pub line_height: f64,
}

impl Card {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Baseline-centered y of each label line, vertically centered in the card.
    pub fn line_centers(&self) -> impl Iterator<Item = f64> + '_ {
        let block = self.lines.len() as f64 * self.line_height;
        let top = self.y + (self.height - block) / 2.0;
        (0..self.lines.len()).map(move |i| top + self.line_height * (i as f64 + 0.5))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source_id: String,
    pub target_id: String,
    pub from: Point,
    pub to: Point,
}

impl Link {
    /// Horizontal cubic link: both control points sit on the vertical midline between the ends.
    pub fn control_points(&self) -> (Point, Point) {
        let mx = (self.from.x + self.to.x) / 2.0;
        (Point::new(mx, self.from.y), Point::new(mx, self.to.y))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Draw order; later cards are on top.
    pub cards: Vec<Card>,
    pub links: Vec<Link>,
    index: FxHashMap<String, usize>,
}

impl Scene {
    pub fn build(
        layout: &TreeLayout,
        config: &LayoutConfig,
        theme: &Theme,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let config = config.sanitized();
        let padding = theme.card_padding.max(0.0);
        let inner_width = (config.node_width - 2.0 * padding).max(1.0);

        let cards: Vec<Card> = layout
            .nodes
            .iter()
            .map(|node| {
                let style = theme.text_style(node.kind);
                let wrapped = measure_wrapped(measurer, &node.name, &style, Some(inner_width));
                let line_height = style.font_size.max(1.0) * theme.line_height.max(0.1);
                let text_height = wrapped.lines.len() as f64 * line_height;
                Card {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    kind: node.kind,
                    x: node.x,
                    y: node.y - config.node_height / 2.0,
                    width: config.node_width,
                    height: config.node_height.max(text_height + 2.0 * padding),
                    lines: wrapped.lines,
                    line_height,
                }
            })
            .collect();

        let links = layout
            .edges
            .iter()
            .map(|e| Link {
                source_id: e.source_id.clone(),
                target_id: e.target_id.clone(),
                from: e.from,
                to: e.to,
            })
            .collect();

        let index = cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        tracing::debug!(cards = layout.nodes.len(), "scene rebuilt");
        Self {
            cards,
            links,
            index,
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Union of every card rectangle, `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut cards = self.cards.iter().map(Card::bounds);
        let first = cards.next()?;
        Some(cards.fold(first, |acc, b| acc.union(&b)))
    }

    /// Topmost card containing `p` (content coordinates).
    pub fn hit_test(&self, p: Point) -> Option<&Card> {
        self.cards.iter().rev().find(|c| c.contains(p))
    }
}
