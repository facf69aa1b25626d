use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::{
    config::resolver::OverrideTable,
    foundation::error::{SnapshotError, SnapshotResult},
    run::runner::RunOptions,
    sampling::checkpoints::MAX_OUTPUT_DIMENSION,
};

/// File-level harness configuration. Every field has a default, so `{}` is valid.
///
/// ```json
/// {
///   "overrides": { "Zoom": { "runs_under_alternate_variant": true } },
///   "max_output_dimension": 500,
///   "min_samples": 50,
///   "min_reference_images": 200,
///   "run": { "parallel": true, "threads": 4 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Per-sample configuration overrides.
    pub overrides: OverrideTable,
    /// Cap on the larger side of rendered snapshots.
    pub max_output_dimension: f64,
    /// Minimum expected number of samples.
    pub min_samples: usize,
    /// Minimum expected number of reference images.
    pub min_reference_images: usize,
    /// Threading options for runs.
    pub run: RunOptions,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            overrides: OverrideTable::default(),
            max_output_dimension: MAX_OUTPUT_DIMENSION,
            min_samples: 1,
            min_reference_images: 1,
            run: RunOptions::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> SnapshotResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| SnapshotError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> SnapshotResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open harness config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| SnapshotError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> SnapshotResult<()> {
        if !(self.max_output_dimension.is_finite() && self.max_output_dimension > 0.0) {
            return Err(SnapshotError::validation(format!(
                "max_output_dimension must be positive, got {}",
                self.max_output_dimension
            )));
        }
        if self.run.threads == Some(0) {
            return Err(SnapshotError::validation(
                "run.threads must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/harness.rs"]
mod tests;
