// Plot domain models - chart-ready series and axis settings
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use super::measurement::{Field, NodeId};

/// Synthetic valueless point that breaks a line across an offline interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapMarker {
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPoint {
    pub timestamp: i64,
    /// `None` for gap markers and missing readings; omitted from JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl FieldPoint {
    pub fn new(timestamp: i64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

pub type FieldSeries = Vec<FieldPoint>;

/// Per-node series for a single field, kept in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSeries {
    entries: Vec<(NodeId, FieldSeries)>,
    /// Position of each node in `entries`.
    index: HashMap<NodeId, usize>,
}

impl NodeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node_id: NodeId, series: FieldSeries) {
        match self.index.get(&node_id) {
            Some(&pos) => self.entries[pos].1 = series,
            None => {
                self.index.insert(node_id, self.entries.len());
                self.entries.push((node_id, series));
            }
        }
    }

    /// `None` means the node has no data for this field.
    pub fn get(&self, node_id: NodeId) -> Option<&FieldSeries> {
        self.index.get(&node_id).map(|&pos| &self.entries[pos].1)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FieldSeries)> {
        self.entries.iter().map(|(id, series)| (*id, series))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NodeSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, series)| (id, series)))
    }
}

/// Numeric `[min, max]` range of a chart axis. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest domain covering both `self` and `other`.
    pub fn union(&self, other: &AxisDomain) -> AxisDomain {
        AxisDomain::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn contains(&self, other: &AxisDomain) -> bool {
        self.min <= other.min && self.max >= other.max
    }
}

impl From<AxisDomain> for [f64; 2] {
    fn from(domain: AxisDomain) -> Self {
        [domain.min, domain.max]
    }
}

/// Time axis label pattern, in the charting front-end's format syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickFormat {
    #[serde(rename = "HH:mm")]
    HourMinute,
    #[serde(rename = "D MMM")]
    DayMonth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSpec {
    pub tick_values: Vec<i64>,
    pub tick_format: TickFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSettings {
    pub x_domain: AxisDomain,
    pub y_domain: AxisDomain,
    pub tick_values: Vec<i64>,
    pub tick_format: TickFormat,
    pub unit: &'static str,
    pub title: &'static str,
}

/// Output of one reduction: series per field and node, plus axis settings per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotResult {
    pub data: BTreeMap<Field, NodeSeries>,
    pub settings: BTreeMap<Field, PlotSettings>,
}

impl PlotResult {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.settings.is_empty()
    }
}
