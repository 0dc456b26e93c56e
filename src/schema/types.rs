// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::FlowError;

/// Magnitude selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Leisure,
    Business,
    #[default]
    Total,
}

impl Purpose {
    pub const ALL: [Purpose; 3] = [Purpose::Leisure, Purpose::Business, Purpose::Total];

    pub fn label(self) -> &'static str {
        match self {
            Purpose::Leisure => "leisure",
            Purpose::Business => "business",
            Purpose::Total => "total",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Purpose {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leisure" => Ok(Purpose::Leisure),
            "business" => Ok(Purpose::Business),
            "total" => Ok(Purpose::Total),
            _ => Err(FlowError::UnknownPurpose(s.to_string())),
        }
    }
}

/// `"All"` or one specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    pub fn matches(self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => y == year,
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("All"),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

impl FromStr for YearFilter {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        t.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| FlowError::InvalidYear(s.to_string()))
    }
}

// config files may write `year = 2021` or `year = "All"`
impl<'de> Deserialize<'de> for YearFilter {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        match Raw::deserialize(d)? {
            Raw::Int(y) => i32::try_from(y)
                .map(YearFilter::Year)
                .map_err(|_| serde::de::Error::custom(format!("year {} out of range", y))),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for YearFilter {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            YearFilter::All => s.serialize_str("All"),
            YearFilter::Year(y) => s.serialize_i32(*y),
        }
    }
}

/// Filter dimensions chosen by the host. Owned by the caller and passed in
/// on every pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub year: YearFilter,
    pub purpose: Purpose,
    pub origin_query: String,
    pub destination_query: String,
}

/// Degrees; serializes as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl Serialize for LatLon {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lon].serialize(s)
    }
}

/// A ranked, display-ready flow. Built once per selector pass and never
/// mutated; [`FlowRecord::with_weight`] produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    pub year: i32,
    pub origin_name: String,
    pub destination_name: String,
    pub leisure_volume: f64,
    pub business_volume: f64,
    pub total_volume: f64,
    pub display_value: f64,
    pub display_type: Purpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_coords: Option<LatLon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_coords: Option<LatLon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_weight: Option<f64>,
}

impl FlowRecord {
    pub fn volume(&self, purpose: Purpose) -> f64 {
        match purpose {
            Purpose::Leisure => self.leisure_volume,
            Purpose::Business => self.business_volume,
            Purpose::Total => self.total_volume,
        }
    }

    /// Both endpoints validated, so the flow can be drawn.
    pub fn is_drawable(&self) -> bool {
        self.origin_coords.is_some() && self.destination_coords.is_some()
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            display_weight: Some(weight),
            ..self
        }
    }
}
