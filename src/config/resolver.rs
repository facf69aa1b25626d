use std::collections::BTreeMap;

use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Per-sample comparison settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotConfiguration {
    /// Minimum similarity in `(0, 1]` for a frame to match its baseline.
    pub precision: f64,
    /// Whether the sample is also exercised under [`crate::RenderVariant::Alternate`].
    pub runs_under_alternate_variant: bool,
}

impl Default for SnapshotConfiguration {
    fn default() -> Self {
        Self {
            precision: 1.0,
            runs_under_alternate_variant: false,
        }
    }
}

impl SnapshotConfiguration {
    /// Configuration with the given precision, default variant only.
    pub fn new(precision: f64) -> SnapshotResult<Self> {
        let cfg = Self {
            precision,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Opt the sample into the alternate variant.
    pub fn with_alternate_variant(mut self) -> Self {
        self.runs_under_alternate_variant = true;
        self
    }

    /// Check that `precision` lies in `(0, 1]`.
    pub fn validate(&self) -> SnapshotResult<()> {
        if !(self.precision > 0.0 && self.precision <= 1.0) {
            return Err(SnapshotError::validation(format!(
                "precision must be in (0, 1], got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Immutable mapping from sample id to its configuration override.
///
/// Keys are plain strings: the table may name samples that no longer exist, which the corpus
/// validator reports as orphans.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    try_from = "BTreeMap<String, SnapshotConfiguration>",
    into = "BTreeMap<String, SnapshotConfiguration>"
)]
pub struct OverrideTable(BTreeMap<String, SnapshotConfiguration>);

impl OverrideTable {
    /// Build a table, validating every configuration.
    pub fn new<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, SnapshotConfiguration)>,
    ) -> SnapshotResult<Self> {
        let mut map = BTreeMap::new();
        for (key, cfg) in entries {
            let key = key.into();
            cfg.validate()
                .map_err(|e| SnapshotError::validation(format!("override '{key}': {e}")))?;
            if map.insert(key.clone(), cfg).is_some() {
                return Err(SnapshotError::validation(format!(
                    "duplicate override for '{key}'"
                )));
            }
        }
        Ok(Self(map))
    }

    /// Override registered for `sample_id`, if any.
    pub fn get(&self, sample_id: &str) -> Option<&SnapshotConfiguration> {
        self.0.get(sample_id)
    }

    /// Overridden sample ids, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no overrides.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, SnapshotConfiguration>> for OverrideTable {
    type Error = SnapshotError;

    fn try_from(value: BTreeMap<String, SnapshotConfiguration>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OverrideTable> for BTreeMap<String, SnapshotConfiguration> {
    fn from(value: OverrideTable) -> Self {
        value.0
    }
}

/// Maps a sample id to its effective [`SnapshotConfiguration`].
///
/// Resolution is a pure function of the table given at construction.
#[derive(Clone, Debug, Default)]
pub struct ConfigResolver {
    overrides: OverrideTable,
}

impl ConfigResolver {
    /// Resolver over a fixed override table.
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    /// The override if one is registered, the default configuration otherwise.
    pub fn resolve(&self, sample_id: &str) -> SnapshotConfiguration {
        self.overrides.get(sample_id).copied().unwrap_or_default()
    }

    /// Table this resolver reads from.
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/resolver.rs"]
mod tests;
