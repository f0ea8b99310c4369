//! Condition category registry.
//!
//! The registry is the closed set of canonical weather conditions a chart knows how to draw.
//! Each category carries a unique `sort_index` that defines the default total order used by
//! [`crate::graph::SortMode`], plus the color and icon the renderer paints it with.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionCategory {
    pub id: String,
    pub sort_index: u32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ConditionCategory {
    pub fn new(id: impl Into<String>, sort_index: u32, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sort_index,
            color: color.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }
}

/// Icon references for the five reference categories. Only the renderer consumes these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    pub clear: Option<String>,
    pub cloudy: Option<String>,
    pub overcast: Option<String>,
    pub rain: Option<String>,
    pub snow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<ConditionCategory>",
    into = "Vec<ConditionCategory>"
)]
pub struct ConditionRegistry {
    categories: IndexMap<String, ConditionCategory>,
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::reference()
    }
}

impl ConditionRegistry {
    /// Builds a registry, rejecting duplicate ids and duplicate sort indices.
    pub fn new(categories: impl IntoIterator<Item = ConditionCategory>) -> Result<Self> {
        let mut out: IndexMap<String, ConditionCategory> = IndexMap::new();
        for category in categories {
            if out.contains_key(&category.id) {
                return Err(Error::DuplicateCategory { id: category.id });
            }
            if out.values().any(|c| c.sort_index == category.sort_index) {
                return Err(Error::DuplicateSortIndex {
                    sort_index: category.sort_index,
                });
            }
            out.insert(category.id.clone(), category);
        }
        Ok(Self { categories: out })
    }

    /// The five-category registry the reference weather chart ships with.
    pub fn reference() -> Self {
        Self::with_icons(&IconSet::default())
    }

    pub fn with_icons(icons: &IconSet) -> Self {
        let categories = [
            ConditionCategory::new("Clear", 0, "#fff3b0").with_icon(icons.clear.clone()),
            ConditionCategory::new("Partially cloudy", 1, "#e7d8c9")
                .with_icon(icons.cloudy.clone()),
            ConditionCategory::new("Overcast", 2, "#ddd").with_icon(icons.overcast.clone()),
            ConditionCategory::new("Rain", 3, "#98c1d9").with_icon(icons.rain.clone()),
            ConditionCategory::new("Snow", 4, "#c2dfe3").with_icon(icons.snow.clone()),
        ];
        Self {
            categories: categories
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ConditionCategory> {
        self.categories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.categories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionCategory> {
        self.categories.values()
    }
}

impl TryFrom<Vec<ConditionCategory>> for ConditionRegistry {
    type Error = Error;

    fn try_from(value: Vec<ConditionCategory>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ConditionRegistry> for Vec<ConditionCategory> {
    fn from(value: ConditionRegistry) -> Self {
        value.categories.into_values().collect()
    }
}
