#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Startup artifact loading for the accident-risk service.
//!
//! Three artifacts are read once at process start: the trained classifier
//! (JSON), the encoded feature table (CSV), and the accident sample used for
//! the heatmap (CSV). Everything here is read-only after loading.

pub mod accidents;
pub mod features;
pub mod paths;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use accident_risk_accident_models::AccidentRecord;
use accident_risk_classifier::{Classifier as _, ClassifierError, TreeEnsemble};

pub use features::FeatureTable;
pub use paths::ArtifactPaths;

/// Column holding accident latitude in both CSV tables.
pub const LATITUDE_COLUMN: &str = "Start_Lat";
/// Column holding accident longitude in both CSV tables.
pub const LONGITUDE_COLUMN: &str = "Start_Lng";
/// Column holding the severity code in the accident sample.
pub const SEVERITY_COLUMN: &str = "Severity";

/// Errors that can occur while loading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error opening or reading an artifact file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The classifier document is malformed.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// A required column is absent from a table header.
    #[error("Missing column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A cell could not be parsed.
    #[error("Invalid value in column '{column}' at row {row}: {value:?}")]
    InvalidValue {
        /// Column the cell belongs to.
        column: String,
        /// 1-based data row (header excluded).
        row: usize,
        /// The raw cell text.
        value: String,
    },

    /// Table columns or rows disagree in shape.
    #[error("Inconsistent table: {message}")]
    Inconsistent {
        /// Description of what went wrong.
        message: String,
    },

    /// A table had a header but no data rows.
    #[error("{table} contains no rows")]
    Empty {
        /// Which table was empty.
        table: String,
    },
}

/// Loads the trained classifier from a JSON model file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or the model is
/// malformed.
pub fn load_classifier(path: &Path) -> Result<TreeEnsemble, LoadError> {
    log::info!("Loading classifier from {}", path.display());
    let file = File::open(path)?;
    let model = TreeEnsemble::from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded classifier with {} trees over {} features",
        model.tree_count(),
        model.feature_names().len()
    );
    Ok(model)
}

/// Loads the encoded feature table, keeping the columns named by
/// `feature_names` in that order.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, a required column is
/// missing, a value fails to parse, or the table is empty.
pub fn load_feature_table(
    path: &Path,
    feature_names: &[String],
) -> Result<FeatureTable, LoadError> {
    log::info!("Loading feature table from {}", path.display());
    let table = features::read_feature_table(File::open(path)?, feature_names)?;
    log::info!("Loaded {} feature rows", table.len());
    Ok(table)
}

/// Loads the accident sample in file order.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or a row is malformed.
pub fn load_accidents(path: &Path) -> Result<Vec<AccidentRecord>, LoadError> {
    log::info!("Loading accident sample from {}", path.display());
    let records = accidents::read_accidents(File::open(path)?)?;
    log::info!("Loaded {} accident records", records.len());
    Ok(records)
}

/// Finds the position of `column` in a CSV header.
fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LoadError::MissingColumn {
            column: column.to_string(),
        })
}
