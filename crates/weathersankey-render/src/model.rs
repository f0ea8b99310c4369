use serde::{Deserialize, Serialize};
use weathersankey_core::{Graph, NodeRef, WeatherRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Target region for the flow layout.
///
/// `x` runs along the flow (one column per depth, `width` long); `y` runs along the bands
/// (`height` long). Each column is `node_thickness` wide; nodes within a band are at least
/// `node_gap` apart unless the band is too crowded to fit that gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCanvas {
    pub width: f64,
    pub height: f64,
    pub node_thickness: f64,
    pub node_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub node: NodeRef,
    pub id: String,
    pub color: String,
    pub depth: usize,
    /// Sum of incident link weights.
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl LayoutNode {
    pub fn breadth(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLink {
    pub index: usize,
    pub source: NodeRef,
    pub target: NodeRef,
    pub weight: f64,
    /// Stroke width; never below 1.
    pub width: f64,
    /// Center of the link's slice of the source node.
    pub y0: f64,
    /// Center of the link's slice of the target node.
    pub y1: f64,
}

/// A cubic link curve: `M start C control1 control2 end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    pub start: LayoutPoint,
    pub control1: LayoutPoint,
    pub control2: LayoutPoint,
    pub end: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLayout {
    pub bounds: Option<Bounds>,
    pub canvas: LayoutCanvas,
    /// Gap actually used between neighbouring nodes of a band.
    pub node_padding: f64,
    /// Conditions first (graph order), then dates (record order).
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
    condition_count: usize,
}

impl SankeyLayout {
    pub(crate) fn new(
        canvas: LayoutCanvas,
        node_padding: f64,
        nodes: Vec<LayoutNode>,
        links: Vec<LayoutLink>,
        condition_count: usize,
    ) -> Self {
        let bounds = if nodes.is_empty() {
            None
        } else {
            Some(Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: canvas.width,
                max_y: canvas.height,
            })
        };
        Self {
            bounds,
            canvas,
            node_padding,
            nodes,
            links,
            condition_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, node: NodeRef) -> Option<&LayoutNode> {
        match node {
            NodeRef::Condition(i) if i < self.condition_count => self.nodes.get(i),
            NodeRef::Condition(_) => None,
            NodeRef::Date(i) => self.nodes.get(self.condition_count + i),
        }
    }

    pub fn condition_nodes(&self) -> &[LayoutNode] {
        &self.nodes[..self.condition_count.min(self.nodes.len())]
    }

    pub fn date_nodes(&self) -> &[LayoutNode] {
        &self.nodes[self.condition_count.min(self.nodes.len())..]
    }

    /// Curve from the source's exit edge to the target's entry edge, in layout coordinates.
    pub fn link_path(&self, link: &LayoutLink) -> Option<LinkPath> {
        let source = self.node(link.source)?;
        let target = self.node(link.target)?;
        Some(LinkPath::horizontal(
            LayoutPoint::new(source.x1, link.y0),
            LayoutPoint::new(target.x0, link.y1),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionLabel {
    pub node: NodeRef,
    /// Number of days, drawn at the band-axis end of the node.
    pub text: String,
    pub color: String,
    pub icon: Option<String>,
    pub anchor: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateLabel {
    pub node: NodeRef,
    /// Day of month, centered under the node.
    pub text: String,
    pub anchor: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureChartLayout {
    /// Offset of the chart from the top of the canvas.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Temperature domain as drawn, top to bottom: `[max, min]`.
    pub domain: Option<(f64, f64)>,
    pub tick_values: Vec<f64>,
    pub high_points: Vec<LayoutPoint>,
    pub low_points: Vec<LayoutPoint>,
    pub high_path: Option<String>,
    pub low_path: Option<String>,
    pub high_color: String,
    pub low_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetrics {
    pub sankey_top: f64,
    pub icon_size: f64,
    /// Translation applied to the sankey group (`left_margin`, `sankey_top`).
    pub sankey_origin: LayoutPoint,
    pub sankey_canvas: LayoutCanvas,
    /// Unit suffix for temperature labels.
    pub unit: String,
}

/// Everything a renderer needs after one render call.
///
/// The sankey is drawn vertically: a node's band extent (`y0..y1`) maps to the screen x axis and
/// its flow extent (`x0..x1`) to the screen y axis, relative to `metrics.sankey_origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartModel {
    pub records: Vec<WeatherRecord>,
    pub graph: Graph,
    pub metrics: ChartMetrics,
    pub sankey: SankeyLayout,
    /// One per link, already transposed to screen orientation.
    pub link_paths: Vec<LinkPath>,
    pub condition_labels: Vec<ConditionLabel>,
    pub date_labels: Vec<DateLabel>,
    pub temperature: TemperatureChartLayout,
}
