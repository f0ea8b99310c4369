//! Two-layer condition/date flow graph.
//!
//! Layer 0 holds one node per distinct canonical condition present in the series, layer 1 one
//! node per record (input order). Each record contributes exactly one unit-weight link from its
//! condition to its date; links are never merged.

use crate::records::WeatherRecord;
use crate::registry::ConditionRegistry;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordering policy for the condition layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// First-occurrence order.
    #[default]
    None,
    /// By registry sort index, lowest first ("clear to rain").
    Ascending,
    /// By registry sort index, highest first ("rain to clear").
    Descending,
}

impl SortMode {
    /// Maps the numeric codes used by older chart configs (`0`, `1`, `2`).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Ascending),
            2 => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Identifies a node by layer and position within the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "layer", content = "index", rename_all = "lowercase")]
pub enum NodeRef {
    Condition(usize),
    Date(usize),
}

impl NodeRef {
    pub fn depth(self) -> usize {
        match self {
            Self::Condition(_) => 0,
            Self::Date(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    pub id: String,
    pub sort_index: u32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Number of records (days) with this condition.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateNode {
    pub date: String,
    pub day: u32,
    pub color: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub index: usize,
    /// Position in [`Graph::conditions`].
    pub source: usize,
    /// Position in [`Graph::dates`].
    pub target: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub conditions: Vec<ConditionNode>,
    pub dates: Vec<DateNode>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.dates.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.conditions.len() + self.dates.len()
    }

    /// Flat node index: conditions first, then dates.
    pub fn flat_index(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Condition(i) => i,
            NodeRef::Date(i) => self.conditions.len() + i,
        }
    }

    pub fn node_ref(&self, flat: usize) -> Option<NodeRef> {
        if flat < self.conditions.len() {
            Some(NodeRef::Condition(flat))
        } else if flat < self.node_count() {
            Some(NodeRef::Date(flat - self.conditions.len()))
        } else {
            None
        }
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Condition(i) => i < self.conditions.len(),
            NodeRef::Date(i) => i < self.dates.len(),
        }
    }

    pub fn node_id(&self, node: NodeRef) -> Option<&str> {
        match node {
            NodeRef::Condition(i) => self.conditions.get(i).map(|n| n.id.as_str()),
            NodeRef::Date(i) => self.dates.get(i).map(|n| n.date.as_str()),
        }
    }

    pub fn node_color(&self, node: NodeRef) -> Option<&str> {
        match node {
            NodeRef::Condition(i) => self.conditions.get(i).map(|n| n.color.as_str()),
            NodeRef::Date(i) => self.dates.get(i).map(|n| n.color.as_str()),
        }
    }

    pub fn condition_position(&self, id: &str) -> Option<usize> {
        self.conditions.iter().position(|n| n.id == id)
    }
}

/// Builds the flow graph from normalized records.
pub fn build_graph(
    records: &[WeatherRecord],
    registry: &ConditionRegistry,
    sort: SortMode,
) -> Result<Graph> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.condition.as_str()).or_insert(0) += 1;
    }

    let mut conditions = Vec::with_capacity(counts.len());
    for (&id, &count) in &counts {
        let category = registry.get(id).ok_or_else(|| Error::UnknownCondition {
            condition: id.to_string(),
            raw: id.to_string(),
        })?;
        conditions.push(ConditionNode {
            id: category.id.clone(),
            sort_index: category.sort_index,
            color: category.color.clone(),
            icon: category.icon.clone(),
            count,
        });
    }
    match sort {
        SortMode::None => {}
        SortMode::Ascending => conditions.sort_by_key(|n| n.sort_index),
        SortMode::Descending => conditions.sort_by(|a, b| b.sort_index.cmp(&a.sort_index)),
    }

    let dates: Vec<DateNode> = records
        .iter()
        .map(|r| DateNode {
            date: r.date.clone(),
            day: r.day,
            color: r.color.clone(),
            condition: r.condition.clone(),
        })
        .collect();

    let mut links = Vec::with_capacity(records.len());
    for (target, record) in records.iter().enumerate() {
        let source = conditions
            .iter()
            .position(|n| n.id == record.condition)
            .ok_or_else(|| Error::UnknownCondition {
                condition: record.condition.clone(),
                raw: record.condition_raw.clone(),
            })?;
        links.push(Link {
            index: target,
            source,
            target,
            weight: 1.0,
        });
    }

    tracing::debug!(
        conditions = conditions.len(),
        dates = dates.len(),
        links = links.len(),
        ?sort,
        "built condition/date graph"
    );

    Ok(Graph {
        conditions,
        dates,
        links,
    })
}
