use std::fmt;

use crate::{config::resolver::OverrideTable, corpus::index::CorpusIndex};

/// Which part of the corpus a size check refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusPart {
    /// Animation samples.
    Samples,
    /// Reference images.
    ReferenceImages,
}

impl fmt::Display for CorpusPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Samples => f.write_str("samples"),
            Self::ReferenceImages => f.write_str("reference images"),
        }
    }
}

/// Referential drift or sizing problem in the static corpus.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// A reference image names a sample that does not exist.
    OrphanedBaseline {
        /// Reference image identifier (`<sample>-<checkpoint>`).
        reference: String,
    },
    /// An override names a sample that does not exist.
    OrphanedOverride {
        /// Overridden sample id.
        sample: String,
    },
    /// A stored reference file could not be interpreted.
    MalformedBaseline {
        /// File name as found in storage.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A stored sample file was left out of the corpus.
    InvalidSample {
        /// File name as found in storage.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Fewer entries than expected; usually a misconfigured discovery path.
    CorpusTooSmall {
        /// Part of the corpus that is too small.
        part: CorpusPart,
        /// Entries found.
        found: usize,
        /// Expected minimum.
        minimum: usize,
    },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanedBaseline { reference } => {
                write!(f, "orphaned baseline '{reference}': no such sample")
            }
            Self::OrphanedOverride { sample } => {
                write!(f, "orphaned override '{sample}': no such sample")
            }
            Self::MalformedBaseline { name, reason } => {
                write!(f, "malformed baseline '{name}': {reason}")
            }
            Self::InvalidSample { name, reason } => {
                write!(f, "invalid sample '{name}': {reason}")
            }
            Self::CorpusTooSmall {
                part,
                found,
                minimum,
            } => write!(f, "corpus too small: {found} {part}, expected at least {minimum}"),
        }
    }
}

/// Every violation found by [`CorpusValidator::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct IntegrityReport {
    /// Violations, grouped by check in a fixed order.
    pub violations: Vec<IntegrityViolation>,
}

impl IntegrityReport {
    /// Whether no violation was found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "corpus is consistent");
        }
        writeln!(f, "{} integrity violation(s):", self.violations.len())?;
        for v in &self.violations {
            writeln!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// Cross-checks samples, reference images and overrides.
///
/// Checks are read-only and independent; each reports one violation per offending identifier.
#[derive(Clone, Copy, Debug)]
pub struct CorpusValidator<'a> {
    index: &'a CorpusIndex,
    overrides: &'a OverrideTable,
}

impl<'a> CorpusValidator<'a> {
    /// Validator over a loaded corpus and its override table.
    pub fn new(index: &'a CorpusIndex, overrides: &'a OverrideTable) -> Self {
        Self { index, overrides }
    }

    /// One `OrphanedBaseline` per reference image whose sample is not in the corpus.
    pub fn check_reference_images_have_samples(&self) -> Vec<IntegrityViolation> {
        self.index
            .list_reference_images()
            .filter(|r| !self.index.contains_sample(r.id.sample.as_str()))
            .map(|r| IntegrityViolation::OrphanedBaseline {
                reference: r.id.to_string(),
            })
            .collect()
    }

    /// One `OrphanedOverride` per override key that names no sample.
    pub fn check_overrides_have_samples(&self) -> Vec<IntegrityViolation> {
        self.overrides
            .keys()
            .filter(|k| !self.index.contains_sample(k))
            .map(|k| IntegrityViolation::OrphanedOverride {
                sample: k.to_string(),
            })
            .collect()
    }

    /// One `MalformedBaseline` per stored reference file that could not be interpreted.
    pub fn check_reference_names(&self) -> Vec<IntegrityViolation> {
        self.index
            .malformed_references()
            .map(|(name, reason)| IntegrityViolation::MalformedBaseline {
                name: name.to_string(),
                reason: reason.to_string(),
            })
            .collect()
    }

    /// One `InvalidSample` per stored sample file that could not be given a usable id.
    pub fn check_sample_names(&self) -> Vec<IntegrityViolation> {
        self.index
            .rejected_samples()
            .map(|(name, reason)| IntegrityViolation::InvalidSample {
                name: name.to_string(),
                reason: reason.to_string(),
            })
            .collect()
    }

    /// Report each part of the corpus holding fewer than its expected minimum.
    pub fn check_corpus_non_empty(
        &self,
        min_samples: usize,
        min_reference_images: usize,
    ) -> Vec<IntegrityViolation> {
        let mut out = Vec::new();
        let samples = self.index.sample_count();
        if samples < min_samples {
            out.push(IntegrityViolation::CorpusTooSmall {
                part: CorpusPart::Samples,
                found: samples,
                minimum: min_samples,
            });
        }
        let references = self.index.reference_count();
        if references < min_reference_images {
            out.push(IntegrityViolation::CorpusTooSmall {
                part: CorpusPart::ReferenceImages,
                found: references,
                minimum: min_reference_images,
            });
        }
        out
    }

    /// Run every check.
    #[tracing::instrument(skip(self))]
    pub fn validate(&self, min_samples: usize, min_reference_images: usize) -> IntegrityReport {
        let mut violations = self.check_corpus_non_empty(min_samples, min_reference_images);
        violations.extend(self.check_reference_images_have_samples());
        violations.extend(self.check_overrides_have_samples());
        violations.extend(self.check_reference_names());
        violations.extend(self.check_sample_names());

        for v in &violations {
            tracing::warn!(%v, "corpus integrity violation");
        }
        tracing::info!(violations = violations.len(), "corpus validated");
        IntegrityReport { violations }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/validator.rs"]
mod tests;
