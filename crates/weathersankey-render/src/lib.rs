#![forbid(unsafe_code)]

//! Headless layout for the weather sankey chart.
//!
//! [`render`] turns raw records plus a [`ChartConfig`] into a [`model::ChartModel`]: a
//! two-layer flow layout of conditions → dates, link curves, labels and the aligned temperature
//! chart. [`interaction::InteractionMapper`] answers pointer and hover queries against it;
//! [`WeatherChart`] keeps the last model around for event-driven hosts.

pub mod chart;
pub mod config;
pub mod interaction;
pub mod model;
pub mod path;
pub mod sankey;
pub mod temperature;

pub use chart::{InteractionState, PointerSelection, WeatherChart, render, render_with};
pub use config::{ChartConfig, Margins};
pub use interaction::{HighlightSet, InteractionMapper, OpacityAssignment};
pub use sankey::{LayoutStrategy, TwoLayerSankey};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] weathersankey_core::Error),
    #[error("no layout yet: render the chart before querying it")]
    LayoutNotReady,
    #[error("invalid layout canvas: {message}")]
    InvalidCanvas { message: String },
    #[error("invalid chart config: {message}")]
    InvalidConfig { message: String },
    #[error("invalid graph model: {message}")]
    InvalidModel { message: String },
    #[error("chart config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
