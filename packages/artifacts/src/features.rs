//! Encoded feature table.
//!
//! Each row describes one historical accident. Row `i` of the table is
//! point `i` of the spatial index built over [`FeatureTable::coordinates`],
//! so row order is fixed at load time and never changes.

use std::io::Read;

use crate::{LATITUDE_COLUMN, LONGITUDE_COLUMN, LoadError, column_index};

/// Classifier-ready feature rows plus the coordinates used for lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    coordinates: Vec<(f64, f64)>,
    /// Row-major, `feature_names.len()` values per row.
    values: Vec<f64>,
}

impl FeatureTable {
    /// Builds a table from already-parsed parts.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the table is empty, a row has the wrong
    /// number of values, or the row and coordinate counts differ.
    pub fn from_parts(
        feature_names: Vec<String>,
        coordinates: Vec<(f64, f64)>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::Empty {
                table: "feature table".to_string(),
            });
        }
        if rows.len() != coordinates.len() {
            return Err(LoadError::Inconsistent {
                message: format!(
                    "{} feature rows but {} coordinates",
                    rows.len(),
                    coordinates.len()
                ),
            });
        }

        let width = feature_names.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(LoadError::Inconsistent {
                    message: format!("row {} has {} values, expected {width}", i + 1, row.len()),
                });
            }
            values.extend(row);
        }

        Ok(Self {
            feature_names,
            coordinates,
            values,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always `false` for a successfully loaded table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Feature column names, in row value order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// `(lat, lng)` of every row, in row order.
    #[must_use]
    pub fn coordinates(&self) -> &[(f64, f64)] {
        &self.coordinates
    }

    /// Feature values of row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let width = self.feature_names.len();
        let start = index.checked_mul(width)?;
        self.values.get(start..start + width)
    }
}

/// Reads a feature table from CSV, keeping `feature_names` columns in the
/// given order. Other columns (such as the severity label) are ignored.
///
/// # Errors
///
/// Returns [`LoadError`] if the CSV is malformed, a required column is
/// missing, a value is not a number, a coordinate is not finite, or the
/// table has no rows.
pub fn read_feature_table(
    reader: impl Read,
    feature_names: &[String],
) -> Result<FeatureTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let lat_idx = column_index(&headers, LATITUDE_COLUMN)?;
    let lng_idx = column_index(&headers, LONGITUDE_COLUMN)?;
    let feature_idxs = feature_names
        .iter()
        .map(|name| column_index(&headers, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut coordinates = Vec::new();
    let mut rows = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row_num = i + 1;

        let lat = parse_cell(&record, lat_idx, LATITUDE_COLUMN, row_num)?;
        let lng = parse_cell(&record, lng_idx, LONGITUDE_COLUMN, row_num)?;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(LoadError::InvalidValue {
                column: if lat.is_finite() {
                    LONGITUDE_COLUMN
                } else {
                    LATITUDE_COLUMN
                }
                .to_string(),
                row: row_num,
                value: format!("{lat},{lng}"),
            });
        }

        let row = feature_idxs
            .iter()
            .zip(feature_names)
            .map(|(&idx, name)| parse_cell(&record, idx, name, row_num))
            .collect::<Result<Vec<_>, _>>()?;

        coordinates.push((lat, lng));
        rows.push(row);
    }

    FeatureTable::from_parts(feature_names.to_vec(), coordinates, rows)
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse().map_err(|_| LoadError::InvalidValue {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })
}
