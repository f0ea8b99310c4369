//! Pointer-to-date mapping and hover highlighting over a finished [`SankeyLayout`].
//!
//! Everything here is a pure function of the layout; the host wires the results to whatever
//! event system it has.

use crate::model::SankeyLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use weathersankey_core::NodeRef;

pub const NODE_OPACITY: f64 = 1.0;
pub const NODE_DIMMED_OPACITY: f64 = 0.2;
pub const LINK_OPACITY: f64 = 0.5;
pub const LINK_DIMMED_OPACITY: f64 = 0.2;

/// A hovered node, the nodes it shares a link with, and those links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSet {
    pub nodes: BTreeSet<NodeRef>,
    /// Link indices touching the hovered node.
    pub links: BTreeSet<usize>,
}

impl HighlightSet {
    pub fn contains_node(&self, node: NodeRef) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_link(&self, link: usize) -> bool {
        self.links.contains(&link)
    }
}

/// Opacity per node (layout order) and per link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpacityAssignment {
    pub nodes: Vec<f64>,
    pub links: Vec<f64>,
}

impl OpacityAssignment {
    pub fn restored(layout: &SankeyLayout) -> Self {
        Self {
            nodes: vec![NODE_OPACITY; layout.nodes.len()],
            links: vec![LINK_OPACITY; layout.links.len()],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionMapper<'a> {
    layout: &'a SankeyLayout,
}

impl<'a> InteractionMapper<'a> {
    pub fn new(layout: &'a SankeyLayout) -> Self {
        Self { layout }
    }

    pub fn date_count(&self) -> usize {
        self.layout.date_nodes().len()
    }

    /// Distance between the band starts of consecutive date nodes.
    pub fn spacing(&self) -> Option<f64> {
        match self.layout.date_nodes() {
            [first, second, ..] => Some(second.y0 - first.y0),
            _ => None,
        }
    }

    pub fn span_center(&self, index: usize) -> Option<f64> {
        self.layout.date_nodes().get(index).map(|n| n.center_y())
    }

    /// Maps a band-axis offset (layout coordinates) to a date index.
    ///
    /// Offsets before the first date node resolve to `None`; offsets past the last node clamp
    /// to the last index. Each date owns its span plus the gap after it, so a zero-breadth node
    /// in a crowded band still owns its own start.
    pub fn resolve_index(&self, pos: f64) -> Option<usize> {
        let days = self.layout.date_nodes();
        let first = days.first()?;
        if !(pos >= first.y0) {
            return None;
        }
        days.partition_point(|n| n.y0 <= pos).checked_sub(1)
    }

    /// `node` plus every node sharing a link with it. One pass over the links.
    pub fn neighbors_of(&self, node: NodeRef) -> HighlightSet {
        let mut out = HighlightSet::default();
        if self.layout.node(node).is_none() {
            return out;
        }
        out.nodes.insert(node);
        for link in &self.layout.links {
            if link.source == node || link.target == node {
                out.nodes.insert(link.source);
                out.nodes.insert(link.target);
                out.links.insert(link.index);
            }
        }
        out
    }

    /// Full opacity for highlighted nodes, dimmed otherwise; links not touching the hovered
    /// node are dimmed and the rest keep the resting link opacity.
    pub fn dim(&self, highlight: &HighlightSet) -> OpacityAssignment {
        let nodes = self
            .layout
            .nodes
            .iter()
            .map(|n| {
                if highlight.contains_node(n.node) {
                    NODE_OPACITY
                } else {
                    NODE_DIMMED_OPACITY
                }
            })
            .collect();
        let links = self
            .layout
            .links
            .iter()
            .map(|l| {
                if highlight.contains_link(l.index) {
                    LINK_OPACITY
                } else {
                    LINK_DIMMED_OPACITY
                }
            })
            .collect();
        OpacityAssignment { nodes, links }
    }

    pub fn restore(&self) -> OpacityAssignment {
        OpacityAssignment::restored(self.layout)
    }
}
