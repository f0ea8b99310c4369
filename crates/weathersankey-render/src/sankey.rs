//! Layered flow (sankey) layout for the condition/date graph.
//!
//! The two-layer strategy follows the classic sankey pipeline: node values from incident link
//! weights, one column per depth, proportional band breadths with a shared scale, a few rounds
//! of relaxation toward linked neighbours, then per-link slices inside each node.
//!
//! Node order inside a band is never changed, so user-chosen condition order and record order
//! survive. Relaxation only nudges positions; there is no value-based column sort, and the
//! collision pass that follows each round restores the configured gaps in that same order.
//! With one link per date, a full date band therefore ends at a uniform pitch.

use crate::model::{LayoutCanvas, LayoutLink, LayoutNode, SankeyLayout};
use crate::{Error, Result};
use std::cmp::Ordering;
use weathersankey_core::{Graph, NodeRef};

/// Turns a [`Graph`] into positioned nodes and links. Implementations must be pure: the same
/// graph and canvas always produce the same layout.
pub trait LayoutStrategy {
    fn layout(&self, graph: &Graph, canvas: &LayoutCanvas) -> Result<SankeyLayout>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoLayerSankey {
    /// Relaxation rounds; `0` keeps the initial stacked breadths.
    pub iterations: usize,
}

impl Default for TwoLayerSankey {
    fn default() -> Self {
        Self { iterations: 6 }
    }
}

#[derive(Debug, Clone)]
struct Node {
    source_links: Vec<usize>,
    target_links: Vec<usize>,
    value: f64,
    layer: usize,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

#[derive(Debug, Clone)]
struct Link {
    index: usize,
    source: usize,
    target: usize,
    value: f64,
    width: f64,
    y0: f64,
    y1: f64,
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn check_canvas(canvas: &LayoutCanvas) -> Result<()> {
    let LayoutCanvas {
        width,
        height,
        node_thickness,
        node_gap,
    } = *canvas;
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(Error::InvalidCanvas {
            message: format!("canvas must be positive and finite, got {width}x{height}"),
        });
    }
    if !(node_thickness.is_finite() && node_thickness >= 0.0 && node_thickness <= width) {
        return Err(Error::InvalidCanvas {
            message: format!("node thickness {node_thickness} does not fit width {width}"),
        });
    }
    if !(node_gap.is_finite() && node_gap >= 0.0) {
        return Err(Error::InvalidCanvas {
            message: format!("node gap must be non-negative, got {node_gap}"),
        });
    }
    Ok(())
}

fn sort_source_links_by_target_y0(node_y0: &[f64], links: &[Link], link_indices: &mut [usize]) {
    link_indices.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].target], node_y0[links[b].target])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn sort_target_links_by_source_y0(node_y0: &[f64], links: &[Link], link_indices: &mut [usize]) {
    link_indices.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].source], node_y0[links[b].source])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn reorder_links(nodes: &mut [Node], links: &[Link], column: &[usize]) {
    let node_y0 = nodes.iter().map(|n| n.y0).collect::<Vec<_>>();
    for &ni in column {
        sort_source_links_by_target_y0(&node_y0, links, &mut nodes[ni].source_links);
        sort_target_links_by_source_y0(&node_y0, links, &mut nodes[ni].target_links);
    }
}

fn reorder_node_links(nodes: &mut [Node], links: &[Link], node_idx: usize) {
    let node_y0 = nodes.iter().map(|n| n.y0).collect::<Vec<_>>();

    let target_links = nodes[node_idx].target_links.clone();
    for li in target_links {
        let source = links[li].source;
        sort_source_links_by_target_y0(&node_y0, links, &mut nodes[source].source_links);
    }

    let source_links = nodes[node_idx].source_links.clone();
    for li in source_links {
        let target = links[li].target;
        sort_target_links_by_source_y0(&node_y0, links, &mut nodes[target].target_links);
    }
}

/// Where a link from `source` would enter `target` if the target were aligned to it.
fn target_top(nodes: &[Node], links: &[Link], py: f64, source: usize, target: usize) -> f64 {
    let source_link_count = nodes[source].source_links.len() as f64;
    let mut y = nodes[source].y0 - (source_link_count - 1.0) * py / 2.0;
    for &li in &nodes[source].source_links {
        if links[li].target == target {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[target].target_links {
        if links[li].source == source {
            break;
        }
        y -= links[li].width;
    }
    y
}

fn source_top(nodes: &[Node], links: &[Link], py: f64, source: usize, target: usize) -> f64 {
    let target_link_count = nodes[target].target_links.len() as f64;
    let mut y = nodes[target].y0 - (target_link_count - 1.0) * py / 2.0;
    for &li in &nodes[target].target_links {
        if links[li].source == source {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[source].source_links {
        if links[li].target == target {
            break;
        }
        y -= links[li].width;
    }
    y
}

fn resolve_collisions_top_to_bottom(
    nodes: &mut [Node],
    column: &[usize],
    py: f64,
    mut y: f64,
    from: usize,
    alpha: f64,
) {
    for &ni in &column[from.min(column.len())..] {
        let dy = (y - nodes[ni].y0) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 += dy;
            nodes[ni].y1 += dy;
        }
        y = nodes[ni].y1 + py;
    }
}

fn resolve_collisions_bottom_to_top(
    nodes: &mut [Node],
    column: &[usize],
    py: f64,
    mut y: f64,
    until: usize,
    alpha: f64,
) {
    for &ni in column[..until.min(column.len())].iter().rev() {
        let dy = (nodes[ni].y1 - y) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 -= dy;
            nodes[ni].y1 -= dy;
        }
        y = nodes[ni].y0 - py;
    }
}

/// Pushes overlapping nodes apart outward from the middle node, then back inside `[0, height]`.
/// The column order is preserved.
fn resolve_collisions(nodes: &mut [Node], column: &[usize], py: f64, height: f64, alpha: f64) {
    if column.is_empty() {
        return;
    }
    let i = column.len() >> 1;
    let subject = column[i];
    let above = nodes[subject].y0 - py;
    let below = nodes[subject].y1 + py;
    resolve_collisions_bottom_to_top(nodes, column, py, above, i, alpha);
    resolve_collisions_top_to_bottom(nodes, column, py, below, i + 1, alpha);
    resolve_collisions_bottom_to_top(nodes, column, py, height, column.len(), alpha);
    resolve_collisions_top_to_bottom(nodes, column, py, 0.0, 0, alpha);
}

/// Which linked neighbours a column is pulled toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pull {
    /// Toward link sources: dates follow their condition.
    Upstream,
    /// Toward link targets: conditions follow the dates they feed.
    Downstream,
}

/// Damping for one relaxation round: `alpha` scales the pull, `beta` the collision push.
#[derive(Debug, Clone, Copy)]
struct Round {
    alpha: f64,
    beta: f64,
}

impl Round {
    fn nth(i: usize, iterations: usize) -> Self {
        let alpha = 0.99_f64.powi(i as i32);
        let beta = (1.0 - alpha).max((i as f64 + 1.0) / iterations as f64);
        Self { alpha, beta }
    }
}

/// Moves every node of `column` toward the value-weighted position where its links meet the
/// neighbours on the `pull` side, then pushes overlaps apart. Collisions only shift nodes
/// along the current order, so a band keeps its input order through every round.
fn relax_column(
    nodes: &mut [Node],
    links: &[Link],
    column: &[usize],
    pull: Pull,
    py: f64,
    height: f64,
    round: Round,
) {
    for &ni in column {
        let incident = match pull {
            Pull::Upstream => &nodes[ni].target_links,
            Pull::Downstream => &nodes[ni].source_links,
        };
        let mut y = 0.0;
        let mut w = 0.0;
        for &li in incident {
            let link = &links[li];
            let anchor = match pull {
                Pull::Upstream => target_top(nodes, links, py, link.source, ni),
                Pull::Downstream => source_top(nodes, links, py, ni, link.target),
            };
            y += anchor * link.value;
            w += link.value;
        }
        if !(w > 0.0) {
            continue;
        }
        let dy = (y / w - nodes[ni].y0) * round.alpha;
        nodes[ni].y0 += dy;
        nodes[ni].y1 += dy;
        reorder_node_links(nodes, links, ni);
    }
    resolve_collisions(nodes, column, py, height, round.beta);
}

impl LayoutStrategy for TwoLayerSankey {
    fn layout(&self, graph: &Graph, canvas: &LayoutCanvas) -> Result<SankeyLayout> {
        check_canvas(canvas)?;
        let width = canvas.width;
        let height = canvas.height;
        let dx = canvas.node_thickness;
        let condition_count = graph.conditions.len();

        let mut nodes: Vec<Node> = (0..graph.node_count())
            .map(|i| Node {
                source_links: Vec::new(),
                target_links: Vec::new(),
                value: 0.0,
                layer: if i < condition_count { 0 } else { 1 },
                x0: 0.0,
                x1: 0.0,
                y0: 0.0,
                y1: 0.0,
            })
            .collect();

        let mut links: Vec<Link> = Vec::with_capacity(graph.links.len());
        for (i, l) in graph.links.iter().enumerate() {
            let source = NodeRef::Condition(l.source);
            let target = NodeRef::Date(l.target);
            if !graph.contains(source) || !graph.contains(target) {
                return Err(Error::InvalidModel {
                    message: format!(
                        "link {} points outside the graph ({} -> {})",
                        l.index, l.source, l.target
                    ),
                });
            }
            let source = graph.flat_index(source);
            let target = graph.flat_index(target);
            links.push(Link {
                index: i,
                source,
                target,
                value: l.weight,
                width: 0.0,
                y0: 0.0,
                y1: 0.0,
            });
            nodes[source].source_links.push(i);
            nodes[target].target_links.push(i);
        }

        for n in &mut nodes {
            let out_sum: f64 = n.source_links.iter().map(|&li| links[li].value).sum();
            let in_sum: f64 = n.target_links.iter().map(|&li| links[li].value).sum();
            n.value = out_sum.max(in_sum);
        }

        let column_count = nodes.iter().map(|n| n.layer + 1).max().unwrap_or(0);
        let kx = if column_count <= 1 {
            0.0
        } else {
            (width - dx) / (column_count as f64 - 1.0)
        };
        let mut columns: Vec<Vec<usize>> = vec![Vec::new(); column_count];
        for (i, n) in nodes.iter_mut().enumerate() {
            n.x0 = n.layer as f64 * kx;
            n.x1 = n.x0 + dx;
            columns[n.layer].push(i);
        }

        let max_len = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let py = if max_len <= 1 {
            canvas.node_gap
        } else {
            canvas.node_gap.min(height / (max_len as f64 - 1.0))
        };

        let mut ky = f64::INFINITY;
        for col in &columns {
            let sum_values: f64 = col.iter().map(|&ni| nodes[ni].value).sum();
            if col.is_empty() || sum_values <= 0.0 {
                continue;
            }
            let denom = height - (col.len() as f64 - 1.0) * py;
            ky = ky.min(denom / sum_values);
        }
        // Rounding in `height - (n - 1) * py` can dip just below zero on a full band.
        ky = if ky.is_finite() { ky.max(0.0) } else { 0.0 };

        for col in &columns {
            let mut y = 0.0;
            for &ni in col {
                nodes[ni].y0 = y;
                nodes[ni].y1 = y + nodes[ni].value * ky;
                y = nodes[ni].y1 + py;
                for &li in &nodes[ni].source_links {
                    links[li].width = links[li].value * ky;
                }
            }
            let n = col.len();
            if n > 0 {
                let offset = (height - y + py) / (n as f64 + 1.0);
                for (i, &ni) in col.iter().enumerate() {
                    let adj = offset * (i as f64 + 1.0);
                    nodes[ni].y0 += adj;
                    nodes[ni].y1 += adj;
                }
                reorder_links(&mut nodes, &links, col);
            }
        }

        let upstream = columns.len().saturating_sub(1);
        for i in 0..self.iterations {
            let round = Round::nth(i, self.iterations);
            for column in columns[..upstream].iter().rev() {
                relax_column(&mut nodes, &links, column, Pull::Downstream, py, height, round);
            }
            for column in columns.iter().skip(1) {
                relax_column(&mut nodes, &links, column, Pull::Upstream, py, height, round);
            }
            tracing::trace!(
                iteration = i,
                alpha = round.alpha,
                beta = round.beta,
                "relaxed sankey columns"
            );
        }

        for node in &nodes {
            let mut y0 = node.y0;
            let mut y1 = node.y0;
            for &li in &node.source_links {
                links[li].y0 = y0 + links[li].width / 2.0;
                y0 += links[li].width;
            }
            for &li in &node.target_links {
                links[li].y1 = y1 + links[li].width / 2.0;
                y1 += links[li].width;
            }
        }

        let mut layout_nodes = Vec::with_capacity(nodes.len());
        for (i, n) in nodes.iter().enumerate() {
            let Some(node) = graph.node_ref(i) else {
                continue;
            };
            layout_nodes.push(LayoutNode {
                node,
                id: graph.node_id(node).unwrap_or_default().to_string(),
                color: graph.node_color(node).unwrap_or_default().to_string(),
                depth: n.layer,
                value: n.value,
                x0: n.x0,
                x1: n.x1,
                y0: n.y0,
                y1: n.y1,
            });
        }

        let layout_links: Vec<LayoutLink> = links
            .iter()
            .map(|l| LayoutLink {
                index: l.index,
                source: NodeRef::Condition(l.source),
                target: NodeRef::Date(l.target - condition_count),
                weight: l.value,
                width: l.width.max(1.0),
                y0: l.y0,
                y1: l.y1,
            })
            .collect();

        tracing::debug!(
            nodes = layout_nodes.len(),
            links = layout_links.len(),
            width,
            height,
            ky,
            py,
            "laid out sankey"
        );

        Ok(SankeyLayout::new(
            *canvas,
            py,
            layout_nodes,
            layout_links,
            condition_count,
        ))
    }
}
