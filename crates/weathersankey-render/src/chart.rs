//! The top-level render entry point and the stateful chart wrapper hosts drive from their
//! pointer events.

use crate::config::ChartConfig;
use crate::interaction::{HighlightSet, InteractionMapper, OpacityAssignment};
use crate::model::{
    ChartMetrics, ChartModel, ConditionLabel, DateLabel, LayoutPoint, LinkPath, SankeyLayout,
};
use crate::sankey::{LayoutStrategy, TwoLayerSankey};
use crate::temperature::{TemperatureReadout, layout_temperature_chart};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weathersankey_core::{NodeRef, build_weather_graph};

/// Distance between a condition's day count and the top of its node.
const CONDITION_LABEL_LIFT: f64 = 2.0;
/// Default gap between the indicator line and its labels.
const READOUT_GAP: f64 = 5.0;

/// Normalizes, builds the graph, lays it out and composes the chart model.
pub fn render(records: &[Value], config: &ChartConfig) -> Result<ChartModel> {
    let strategy = TwoLayerSankey {
        iterations: config.iterations,
    };
    render_with(&strategy, records, config)
}

pub fn render_with(
    strategy: &dyn LayoutStrategy,
    records: &[Value],
    config: &ChartConfig,
) -> Result<ChartModel> {
    config.validate()?;
    let (records, graph) =
        build_weather_graph(records, &config.columns, &config.registry, config.sort)?;
    if records.is_empty() {
        tracing::warn!("rendering an empty weather series");
    }

    let sankey_canvas = config.sankey_canvas();
    let sankey = strategy.layout(&graph, &sankey_canvas)?;
    let metrics = ChartMetrics {
        sankey_top: config.effective_sankey_top(),
        icon_size: config.effective_icon_size(),
        sankey_origin: LayoutPoint::new(config.left_margin, config.effective_sankey_top()),
        sankey_canvas,
        unit: config.unit.clone(),
    };

    let link_paths: Vec<LinkPath> = sankey
        .links
        .iter()
        .filter_map(|l| sankey.link_path(l))
        .map(|p| p.transposed())
        .collect();

    let condition_labels = sankey
        .condition_nodes()
        .iter()
        .filter_map(|n| {
            let NodeRef::Condition(i) = n.node else {
                return None;
            };
            let condition = graph.conditions.get(i)?;
            Some(ConditionLabel {
                node: n.node,
                text: condition.count.to_string(),
                color: condition.color.clone(),
                icon: condition.icon.clone(),
                anchor: LayoutPoint::new(n.y1, n.x0 - CONDITION_LABEL_LIFT),
            })
        })
        .collect();

    let date_labels = sankey
        .date_nodes()
        .iter()
        .filter_map(|n| {
            let NodeRef::Date(i) = n.node else {
                return None;
            };
            let date = graph.dates.get(i)?;
            Some(DateLabel {
                node: n.node,
                text: date.day.to_string(),
                anchor: LayoutPoint::new(n.center_y(), n.x0 + config.margins.sankey_bottom),
            })
        })
        .collect();

    let temperature = layout_temperature_chart(&records, config);

    tracing::debug!(
        records = records.len(),
        nodes = sankey.nodes.len(),
        links = sankey.links.len(),
        "rendered weather chart"
    );

    Ok(ChartModel {
        records,
        graph,
        metrics,
        sankey,
        link_paths,
        condition_labels,
        date_labels,
        temperature,
    })
}

/// A resolved pointer position over the temperature chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerSelection {
    pub index: usize,
    /// Pointer x, in temperature-chart coordinates; where the indicator line goes.
    pub indicator_x: f64,
    /// Far band edge of the last date node, in the same coordinates.
    pub right_edge: f64,
    pub readout: TemperatureReadout,
}

impl PointerSelection {
    /// Horizontal offset for the readout labels: flipped to the left of the line when a label
    /// of `label_width` would run past the last date.
    pub fn label_offset(&self, label_width: f64) -> f64 {
        if self.indicator_x + label_width > self.right_edge {
            -label_width
        } else {
            READOUT_GAP
        }
    }
}

impl ChartModel {
    pub fn interaction(&self) -> InteractionMapper<'_> {
        InteractionMapper::new(&self.sankey)
    }

    pub fn layout(&self) -> &SankeyLayout {
        &self.sankey
    }

    /// Maps a pointer x (temperature-chart coordinates, margin included) to a date.
    /// The left margin and anything before the first date node select nothing.
    pub fn resolve_pointer(&self, x: f64) -> Option<PointerSelection> {
        let origin = self.metrics.sankey_origin.x;
        if !(x >= origin) {
            return None;
        }
        let index = self.interaction().resolve_index(x - origin)?;
        let record = self.records.get(index)?;
        let right_edge = origin + self.sankey.date_nodes().last()?.y1;
        Some(PointerSelection {
            index,
            indicator_x: x,
            right_edge,
            readout: TemperatureReadout::new(index, record, &self.metrics.unit),
        })
    }
}

/// Hover and pointer state for one rendered model.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub selected_date: Option<usize>,
    pub hovered: Option<NodeRef>,
    pub highlight: HighlightSet,
    pub opacity: OpacityAssignment,
}

impl InteractionState {
    fn resting(model: &ChartModel) -> Self {
        Self {
            selected_date: None,
            hovered: None,
            highlight: HighlightSet::default(),
            opacity: model.interaction().restore(),
        }
    }
}

/// One configuration plus the last successfully rendered model.
///
/// A failed render keeps the previous model and interaction state.
#[derive(Debug, Clone)]
pub struct WeatherChart {
    config: ChartConfig,
    rendered: Option<(ChartModel, InteractionState)>,
}

impl WeatherChart {
    pub fn new(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rendered: None,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn render(&mut self, records: &[Value]) -> Result<&ChartModel> {
        let model = render(records, &self.config)?;
        let state = InteractionState::resting(&model);
        Ok(&self.rendered.insert((model, state)).0)
    }

    pub fn model(&self) -> Result<&ChartModel> {
        self.rendered
            .as_ref()
            .map(|(m, _)| m)
            .ok_or(Error::LayoutNotReady)
    }

    pub fn state(&self) -> Result<&InteractionState> {
        self.rendered
            .as_ref()
            .map(|(_, s)| s)
            .ok_or(Error::LayoutNotReady)
    }

    fn rendered_mut(&mut self) -> Result<(&ChartModel, &mut InteractionState)> {
        self.rendered
            .as_mut()
            .map(|(m, s)| (&*m, s))
            .ok_or(Error::LayoutNotReady)
    }

    /// Date index under a band-axis offset in layout coordinates.
    pub fn resolve_index(&self, pos: f64) -> Result<Option<usize>> {
        Ok(self.model()?.interaction().resolve_index(pos))
    }

    pub fn neighbors_of(&self, node: NodeRef) -> Result<HighlightSet> {
        Ok(self.model()?.interaction().neighbors_of(node))
    }

    /// Pointer moved over the temperature chart. In the dead zone the selection is unchanged.
    pub fn pointer_move(&mut self, x: f64) -> Result<Option<PointerSelection>> {
        let (model, state) = self.rendered_mut()?;
        let selection = model.resolve_pointer(x);
        if let Some(sel) = &selection {
            state.selected_date = Some(sel.index);
        }
        Ok(selection)
    }

    pub fn pointer_leave(&mut self) -> Result<()> {
        let (_, state) = self.rendered_mut()?;
        state.selected_date = None;
        Ok(())
    }

    pub fn hover_node(&mut self, node: NodeRef) -> Result<&OpacityAssignment> {
        let (model, state) = self.rendered_mut()?;
        let mapper = model.interaction();
        let highlight = mapper.neighbors_of(node);
        state.opacity = mapper.dim(&highlight);
        state.highlight = highlight;
        state.hovered = Some(node);
        Ok(&state.opacity)
    }

    /// Restores every node and link to its resting opacity and clears the selected date.
    pub fn unhover(&mut self) -> Result<&OpacityAssignment> {
        let (model, state) = self.rendered_mut()?;
        *state = InteractionState::resting(model);
        Ok(&state.opacity)
    }
}
