#![forbid(unsafe_code)]

//! `weathersankey` is a headless weather sankey chart in Rust.
//!
//! It turns a daily weather series into a flow diagram from conditions to dates plus an aligned
//! temperature chart, and maps pointer positions back to dates for highlighting. Drawing is left
//! to the host: everything comes out as plain, serializable geometry.
//!
//! # Features
//!
//! - `render` (default): layout, temperature chart and pointer mapping (`weathersankey::render`)

pub use weathersankey_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use weathersankey_render::interaction::{
        HighlightSet, InteractionMapper, OpacityAssignment,
    };
    pub use weathersankey_render::model::{ChartModel, LayoutCanvas, SankeyLayout};
    pub use weathersankey_render::{
        ChartConfig, InteractionState, LayoutStrategy, Margins, PointerSelection, TwoLayerSankey,
        WeatherChart,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Data(#[from] weathersankey_core::Error),
        #[error(transparent)]
        Render(#[from] weathersankey_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Renders `records` with `config`.
    pub fn render_chart(
        records: &[serde_json::Value],
        config: &ChartConfig,
    ) -> Result<ChartModel> {
        Ok(weathersankey_render::render(records, config)?)
    }

    /// Parses a JSON array of records and renders it.
    pub fn render_json(text: &str, config: &ChartConfig) -> Result<ChartModel> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(text).map_err(weathersankey_render::Error::from)?;
        render_chart(&records, config)
    }

    /// Lays out an already-built graph with the default strategy.
    pub fn layout_graph(
        graph: &weathersankey_core::Graph,
        canvas: &LayoutCanvas,
    ) -> Result<SankeyLayout> {
        Ok(TwoLayerSankey::default().layout(graph, canvas)?)
    }
}
