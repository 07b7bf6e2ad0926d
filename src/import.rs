//! Cutting-plan row ingestion.
//!
//! Spreadsheet exports from the cutting line arrive with loosely typed
//! columns (floats where sensors should be, stray whitespace, blank
//! cells). This adapter normalizes raw rows into typed placement
//! requests before they reach the engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::request::{PlaceRequest, PartCode, ProjectCode};

/// Sensor value used when the source cell is blank or meaningless
pub const DEFAULT_SENSOR: &str = "1";

/// Part code whose sensor column is meaningful; every other part type
/// always uses the default sensor
pub const SENSOR_AWARE_PART: &str = "PBS";

/// One raw row from a cutting-plan export
#[derive(Debug, Clone, Deserialize)]
pub struct CutPlanRow {
    /// Production order
    #[serde(rename = "OP")]
    pub op: String,
    /// Part-type code
    #[serde(rename = "PART")]
    pub part: String,
    /// Project code
    #[serde(rename = "PROJECT")]
    pub project: String,
    /// Vehicle model the part belongs to
    #[serde(rename = "VEHICLE")]
    pub vehicle: String,
    /// Sensor position, often exported as a float ("3.0")
    #[serde(rename = "SENSOR", default)]
    pub sensor: Option<String>,
    /// When the piece was cut, if the export carries it
    #[serde(rename = "CUT_AT", default)]
    pub cut_at: Option<DateTime<Utc>>,
}

/// Normalize a raw sensor cell.
///
/// Spreadsheet floats collapse to their integer form ("3.0" -> "3");
/// blanks and NaN-ish placeholders become [`DEFAULT_SENSOR`].
pub fn normalize_sensor(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or("");
    match trimmed {
        "" | "-" | "nan" | "NaN" | "None" | "NULL" | "null" => DEFAULT_SENSOR.to_string(),
        s => match Decimal::from_str(s) {
            Ok(d) => d.normalize().to_string(),
            Err(_) => s.to_string(),
        },
    }
}

impl CutPlanRow {
    /// The sensor the placement should carry: honored for PBS rows,
    /// forced to the default for everything else.
    pub fn effective_sensor(&self) -> String {
        let normalized = normalize_sensor(self.sensor.as_deref());
        if self.part.trim().eq_ignore_ascii_case(SENSOR_AWARE_PART) {
            normalized
        } else {
            DEFAULT_SENSOR.to_string()
        }
    }

    /// Returns true if the row carries every required column
    pub fn is_complete(&self) -> bool {
        !self.op.trim().is_empty()
            && !self.part.trim().is_empty()
            && !self.project.trim().is_empty()
            && !self.vehicle.trim().is_empty()
    }

    /// Convert the row to a typed placement request.
    ///
    /// # Returns
    /// `None` for rows with missing required columns or codes that do
    /// not fit; batch imports skip such rows and continue.
    pub fn to_request(&self) -> Option<PlaceRequest> {
        if !self.is_complete() {
            return None;
        }
        Some(PlaceRequest {
            part: PartCode::new(&self.part)?,
            project: ProjectCode::new(&self.project)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(op: &str, part: &str, project: &str, vehicle: &str, sensor: Option<&str>) -> CutPlanRow {
        CutPlanRow {
            op: op.to_string(),
            part: part.to_string(),
            project: project.to_string(),
            vehicle: vehicle.to_string(),
            sensor: sensor.map(str::to_string),
            cut_at: None,
        }
    }

    #[test]
    fn test_normalize_sensor_float_form() {
        assert_eq!(normalize_sensor(Some("3.0")), "3");
        assert_eq!(normalize_sensor(Some("12.00")), "12");
        assert_eq!(normalize_sensor(Some(" 4 ")), "4");
    }

    #[test]
    fn test_normalize_sensor_placeholders() {
        assert_eq!(normalize_sensor(None), "1");
        assert_eq!(normalize_sensor(Some("")), "1");
        assert_eq!(normalize_sensor(Some("-")), "1");
        assert_eq!(normalize_sensor(Some("nan")), "1");
        assert_eq!(normalize_sensor(Some("None")), "1");
    }

    #[test]
    fn test_normalize_sensor_non_numeric_kept() {
        assert_eq!(normalize_sensor(Some("A2")), "A2");
    }

    #[test]
    fn test_effective_sensor_only_for_pbs() {
        let pbs = row("100", "PBS", "P-1", "V1", Some("3.0"));
        assert_eq!(pbs.effective_sensor(), "3");

        let other = row("100", "TSP", "P-1", "V1", Some("3.0"));
        assert_eq!(other.effective_sensor(), "1");
    }

    #[test]
    fn test_to_request() {
        let r = row("100", " tsp ", " p-1 ", "V1", None);
        let req = r.to_request().unwrap();
        assert_eq!(req.part.as_str(), "TSP");
        assert_eq!(req.project.as_str(), "P-1");
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        assert!(row("", "TSP", "P-1", "V1", None).to_request().is_none());
        assert!(row("100", "", "P-1", "V1", None).to_request().is_none());
        assert!(row("100", "TSP", "", "V1", None).to_request().is_none());
        assert!(row("100", "TSP", "P-1", "", None).to_request().is_none());
    }

    #[test]
    fn test_csv_round_trip() {
        let data = "OP,PART,PROJECT,VEHICLE,SENSOR\n4711,PBS,P-9,HATCH,2.0\n4712,TSA,P-9,HATCH,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<CutPlanRow> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].effective_sensor(), "2");
        assert_eq!(rows[1].effective_sensor(), "1");
        assert!(rows[1].to_request().is_some());
    }
}
