use serde::{Deserialize, Serialize};
use tracing::debug;

use super::utils::cell_to_f64;
use super::CellValue;
use crate::schema::LatLon;

/// Validated origin and destination positions of one flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCoords {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// Validates (and possibly corrects) the four coordinate cells of a record.
/// All-or-nothing: `None` means the record cannot be drawn.
pub trait CoordinateRepair {
    fn repair(
        &self,
        lat_o: &CellValue,
        lon_o: &CellValue,
        lat_d: &CellValue,
        lon_d: &CellValue,
    ) -> Option<FlowCoords>;
}

/// Longitude handling applied after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LongitudeRepair {
    /// Negate any positive longitude. The source data drops the sign on
    /// western-hemisphere longitudes.
    #[default]
    Western,
    /// Validate only.
    None,
}

impl LongitudeRepair {
    fn apply(self, lon: f64) -> f64 {
        match self {
            LongitudeRepair::Western if lon > 0.0 => -lon,
            _ => lon,
        }
    }
}

impl CoordinateRepair for LongitudeRepair {
    fn repair(
        &self,
        lat_o: &CellValue,
        lon_o: &CellValue,
        lat_d: &CellValue,
        lon_d: &CellValue,
    ) -> Option<FlowCoords> {
        let parsed = (
            cell_to_f64(lat_o),
            cell_to_f64(lon_o),
            cell_to_f64(lat_d),
            cell_to_f64(lon_d),
        );
        let (Some(lat_o), Some(lon_o), Some(lat_d), Some(lon_d)) = parsed else {
            debug!(?parsed, "coordinate cell not a finite number");
            return None;
        };

        if !valid_lat(lat_o) || !valid_lat(lat_d) {
            debug!(lat_o, lat_d, "latitude out of range");
            return None;
        }

        Some(FlowCoords {
            origin: LatLon {
                lat: lat_o,
                lon: self.apply(lon_o),
            },
            destination: LatLon {
                lat: lat_d,
                lon: self.apply(lon_d),
            },
        })
    }
}

fn valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}
