//! Canonical file paths for the startup artifacts.
//!
//! Defaults are relative to the process working directory's `data/`
//! directory; the server configuration can override each one.

use std::path::{Path, PathBuf};

/// Default classifier model file name.
pub const MODEL_FILE: &str = "accident_model.json";
/// Default encoded feature table file name.
pub const FEATURES_FILE: &str = "encoded_features.csv";
/// Default accident sample file name.
pub const ACCIDENTS_FILE: &str = "accidents_sample.csv";

/// Returns the default `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Locations of the three artifacts loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Trained classifier (JSON).
    pub model: PathBuf,
    /// Encoded feature table (CSV).
    pub features: PathBuf,
    /// Accident sample for the heatmap (CSV).
    pub accidents: PathBuf,
}

impl ArtifactPaths {
    /// Paths for all three artifacts inside `dir`, using the default file
    /// names.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            features: dir.join(FEATURES_FILE),
            accidents: dir.join(ACCIDENTS_FILE),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(&data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_in_data_dir() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.model, Path::new("data/accident_model.json"));
        assert_eq!(paths.features, Path::new("data/encoded_features.csv"));
        assert_eq!(paths.accidents, Path::new("data/accidents_sample.csv"));
    }
}
