// Measurement domain model - raw sensor readings and the fields they carry
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::plot::AxisDomain;

pub type NodeId = u32;

/// One timestamped reading reported by a sensor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub node_id: NodeId,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default, rename = "battery1_level")]
    pub battery1_level: Option<f64>,
    #[serde(default, rename = "battery2_level")]
    pub battery2_level: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl MeasurementRecord {
    pub fn new(node_id: NodeId, timestamp: i64) -> Self {
        Self {
            node_id,
            timestamp,
            temperature: None,
            humidity: None,
            battery1_level: None,
            battery2_level: None,
            name: None,
        }
    }

    pub fn with_value(mut self, field: Field, value: f64) -> Self {
        match field {
            Field::Temperature => self.temperature = Some(value),
            Field::Humidity => self.humidity = Some(value),
            Field::Battery1Level => self.battery1_level = Some(value),
            Field::Battery2Level => self.battery2_level = Some(value),
        }
        self
    }

    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::Battery1Level => self.battery1_level,
            Field::Battery2Level => self.battery2_level,
        }
    }
}

/// Tracked measurement fields. Ordering matches chart layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Temperature,
    Humidity,
    Battery1Level,
    Battery2Level,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Temperature,
        Field::Humidity,
        Field::Battery1Level,
        Field::Battery2Level,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Battery1Level => "battery1_level",
            Field::Battery2Level => "battery2_level",
        }
    }

    /// Sensible axis range used when the data sits inside it.
    pub fn default_domain(&self) -> AxisDomain {
        match self {
            Field::Temperature => AxisDomain::new(15.0, 30.0),
            Field::Humidity => AxisDomain::new(20.0, 80.0),
            Field::Battery1Level | Field::Battery2Level => AxisDomain::new(1.0, 1.65),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Temperature => "°C",
            Field::Humidity => "%",
            Field::Battery1Level | Field::Battery2Level => "V",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Field::Temperature => "Temperature",
            Field::Humidity => "Humidity",
            Field::Battery1Level | Field::Battery2Level => "Battery",
        }
    }

    pub fn is_battery(&self) -> bool {
        matches!(self, Field::Battery1Level | Field::Battery2Level)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown measurement field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
