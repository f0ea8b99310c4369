#![forbid(unsafe_code)]

//! Weather series normalization + condition/date flow graph (headless).
//!
//! Pipeline:
//! - [`records::normalize_records`]: raw JSON records → canonical [`WeatherRecord`]s
//! - [`graph::build_graph`]: records → two-layer [`Graph`] of condition and date nodes
//!
//! Layout and pointer mapping live in `weathersankey-render`.

pub mod error;
pub mod graph;
pub mod records;
pub mod registry;

pub use error::{Error, Result};
pub use graph::{ConditionNode, DateNode, Graph, Link, NodeRef, SortMode, build_graph};
pub use records::{
    ColumnMapping, WeatherRecord, canonical_condition, normalize_record, normalize_records,
};
pub use registry::{ConditionCategory, ConditionRegistry, IconSet};

/// Normalizes `records` and builds the flow graph in one step.
pub fn build_weather_graph(
    records: &[serde_json::Value],
    columns: &ColumnMapping,
    registry: &ConditionRegistry,
    sort: SortMode,
) -> Result<(Vec<WeatherRecord>, Graph)> {
    let normalized = normalize_records(records, columns, registry)?;
    let graph = build_graph(&normalized, registry, sort)?;
    Ok((normalized, graph))
}
