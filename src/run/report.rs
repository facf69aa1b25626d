use std::{collections::BTreeMap, fmt};

use crate::{
    corpus::index::ReferenceId,
    foundation::core::{Checkpoint, RenderVariant, SampleId},
    run::collab::RenderError,
};

/// Why a single `(sample, checkpoint, variant)` item did not pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemFailure {
    /// The sample could not be rendered (or parsed) at this checkpoint.
    RenderFailure {
        /// Renderer error.
        error: RenderError,
    },
    /// No reference image exists for this `(sample, checkpoint)`.
    MissingBaseline,
    /// The rendered frame differs from its reference beyond the configured precision.
    ComparisonMismatch {
        /// Precision the item was held to.
        precision: f64,
    },
}

impl ItemFailure {
    /// Coarse kind used for summary counts.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RenderFailure { .. } => FailureKind::RenderFailure,
            Self::MissingBaseline => FailureKind::MissingBaseline,
            Self::ComparisonMismatch { .. } => FailureKind::ComparisonMismatch,
        }
    }
}

/// Per-item failure categories.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`ItemFailure::RenderFailure`].
    RenderFailure,
    /// See [`ItemFailure::MissingBaseline`].
    MissingBaseline,
    /// See [`ItemFailure::ComparisonMismatch`].
    ComparisonMismatch,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderFailure => f.write_str("render failure"),
            Self::MissingBaseline => f.write_str("missing baseline"),
            Self::ComparisonMismatch => f.write_str("comparison mismatch"),
        }
    }
}

/// Result for one `(sample, checkpoint, variant)` item.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ComparisonResult {
    /// Sample that was exercised.
    pub sample: SampleId,
    /// Checkpoint that was rendered.
    pub checkpoint: Checkpoint,
    /// Variant the sample was rendered under.
    pub variant: RenderVariant,
    /// Similarity reported by the comparator, if a comparison took place.
    pub similarity: Option<f64>,
    /// `None` when the item passed.
    pub failure: Option<ItemFailure>,
}

impl ComparisonResult {
    /// Whether the rendered frame matched its baseline.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Identifier of the baseline this item was (or would have been) compared to.
    pub fn reference_id(&self) -> ReferenceId {
        ReferenceId::new(self.sample.clone(), self.checkpoint)
    }
}

/// All results of one run, ordered by sample then checkpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Variant the run exercised.
    pub variant: RenderVariant,
    /// One entry per evaluated item; skipped samples have none.
    pub results: Vec<ComparisonResult>,
}

impl RunReport {
    /// Whether every evaluated item passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(ComparisonResult::passed)
    }

    /// Items that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Aggregate counts and failing identifiers.
    pub fn summary(&self) -> RunSummary {
        let mut failures_by_kind = BTreeMap::new();
        let mut failing = Vec::new();
        for r in self.results.iter() {
            if let Some(failure) = &r.failure {
                *failures_by_kind.entry(failure.kind()).or_insert(0usize) += 1;
                failing.push(r.reference_id().to_string());
            }
        }
        RunSummary {
            variant: self.variant,
            total: self.results.len(),
            passed: self.results.len() - failing.len(),
            failures_by_kind,
            failing,
        }
    }
}

/// User-facing digest of a [`RunReport`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    /// Variant the run exercised.
    pub variant: RenderVariant,
    /// Items evaluated.
    pub total: usize,
    /// Items that passed.
    pub passed: usize,
    /// Failure counts; kinds with no failures are absent.
    pub failures_by_kind: BTreeMap<FailureKind, usize>,
    /// `<sample>-<checkpoint>` of every failing item, in run order.
    pub failing: Vec<String>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} variant: {} evaluated, {} passed, {} failed",
            self.variant,
            self.total,
            self.passed,
            self.failing.len()
        )?;
        for (kind, n) in &self.failures_by_kind {
            writeln!(f, "  {kind}: {n}")?;
        }
        for id in &self.failing {
            writeln!(f, "  failed: {id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/run/report.rs"]
mod tests;
