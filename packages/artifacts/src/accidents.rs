//! Accident sample table for the heatmap.

use std::io::Read;

use accident_risk_accident_models::{AccidentRecord, Severity};

use crate::{LATITUDE_COLUMN, LONGITUDE_COLUMN, LoadError, SEVERITY_COLUMN, column_index};

/// Reads `(Start_Lat, Start_Lng, Severity)` from every CSV row, in file
/// order. Other columns are ignored. A header-only file yields no records.
///
/// # Errors
///
/// Returns [`LoadError`] if the CSV is malformed, a required column is
/// missing, a coordinate is not a finite number, or a severity is not a
/// non-negative integer.
pub fn read_accidents(reader: impl Read) -> Result<Vec<AccidentRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let lat_idx = column_index(&headers, LATITUDE_COLUMN)?;
    let lng_idx = column_index(&headers, LONGITUDE_COLUMN)?;
    let severity_idx = column_index(&headers, SEVERITY_COLUMN)?;

    let mut records = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let latitude = parse_coordinate(&record, lat_idx, LATITUDE_COLUMN, row)?;
        let longitude = parse_coordinate(&record, lng_idx, LONGITUDE_COLUMN, row)?;

        let raw = record.get(severity_idx).unwrap_or_default();
        let severity = parse_severity(raw).ok_or_else(|| LoadError::InvalidValue {
            column: SEVERITY_COLUMN.to_string(),
            row,
            value: raw.to_string(),
        })?;

        records.push(AccidentRecord::new(latitude, longitude, severity));
    }

    Ok(records)
}

fn parse_coordinate(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        })
}

/// Accepts integer codes written either as `2` or as `2.0`.
fn parse_severity(raw: &str) -> Option<Severity> {
    if let Ok(value) = raw.parse::<u32>() {
        return Some(Severity::new(value));
    }
    let value = raw.parse::<f64>().ok()?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let code = value as u32;
    Some(Severity::new(code))
}
