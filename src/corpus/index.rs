use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use crate::foundation::{
    core::{Checkpoint, FrameRGBA, RenderSize, SampleId},
    error::{SnapshotError, SnapshotResult},
};

/// Opaque renderer-facing handle to a sample's source content.
///
/// The harness never inspects it; renderers downcast it to whatever their sample provider stored.
#[derive(Clone)]
pub struct SampleHandle(Arc<dyn Any + Send + Sync>);

impl SampleHandle {
    /// Wrap provider-specific source content.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the content as `T`, if that is what the provider stored.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for SampleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SampleHandle")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}

/// One named animation description plus its intrinsic dimensions.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Unique identifier.
    pub id: SampleId,
    /// Intrinsic size of the animation.
    pub size: RenderSize,
    /// Source content for the renderer.
    pub handle: SampleHandle,
}

/// Identifier of a reference image: `(sample id, checkpoint)`.
///
/// The textual form is `<sample id>-<checkpoint label>`, e.g. `Spin-25%`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ReferenceId {
    /// Sample component. It is not guaranteed to name an existing sample.
    pub sample: SampleId,
    /// Checkpoint component.
    pub checkpoint: Checkpoint,
}

impl ReferenceId {
    /// Build an identifier from its parts.
    pub fn new(sample: SampleId, checkpoint: Checkpoint) -> Self {
        Self { sample, checkpoint }
    }

    /// Decompose `<sample id>-<checkpoint label>`.
    ///
    /// Sample ids may contain `-`; the label is always the last segment.
    pub fn parse(name: &str) -> SnapshotResult<Self> {
        let (sample, label) = name.rsplit_once('-').ok_or_else(|| {
            SnapshotError::validation(format!(
                "reference name '{name}' has no '-<checkpoint>' suffix"
            ))
        })?;
        let checkpoint = Checkpoint::from_label(label).ok_or_else(|| {
            SnapshotError::validation(format!(
                "reference name '{name}' has unknown checkpoint label '{label}'"
            ))
        })?;
        Ok(Self {
            sample: SampleId::new(sample)?,
            checkpoint,
        })
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.sample, self.checkpoint.label())
    }
}

/// A stored baseline image for one `(sample, checkpoint)` pair.
#[derive(Clone, Debug)]
pub struct ReferenceImage {
    /// Identifier.
    pub id: ReferenceId,
    /// Decoded payload.
    pub image: FrameRGBA,
}

/// A sample entry as reported by a [`SampleProvider`].
#[derive(Clone, Debug)]
pub enum DiscoveredSample {
    /// Sample whose header could be read.
    Ready(Sample),
    /// Sample that exists in the corpus but whose description could not be parsed.
    Unparsable {
        /// Identifier derived from the sample's location.
        id: SampleId,
        /// Parser message.
        reason: String,
    },
    /// Stored file that cannot be given a usable identifier, e.g. because its name is not a
    /// valid id or collides with an earlier sample.
    Rejected {
        /// Name as found in storage.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl DiscoveredSample {
    /// Identifier of the entry, if it has one.
    pub fn id(&self) -> Option<&SampleId> {
        match self {
            Self::Ready(s) => Some(&s.id),
            Self::Unparsable { id, .. } => Some(id),
            Self::Rejected { .. } => None,
        }
    }
}

/// A reference entry as reported by a [`ReferenceProvider`].
#[derive(Clone, Debug)]
pub enum DiscoveredReference {
    /// Decodable image with a well-formed identifier.
    Ready(ReferenceImage),
    /// Stored file whose name or payload could not be interpreted.
    Malformed {
        /// Name as found in storage.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Enumerates the samples visible to a run.
pub trait SampleProvider {
    /// List every sample. Storage failures must be reported as
    /// [`SnapshotError::CorpusUnavailable`].
    fn discover_samples(&self) -> SnapshotResult<Vec<DiscoveredSample>>;
}

/// Enumerates the reference images visible to a run.
pub trait ReferenceProvider {
    /// List every reference image. Storage failures must be reported as
    /// [`SnapshotError::CorpusUnavailable`].
    fn discover_references(&self) -> SnapshotResult<Vec<DiscoveredReference>>;
}

impl SampleProvider for Vec<DiscoveredSample> {
    fn discover_samples(&self) -> SnapshotResult<Vec<DiscoveredSample>> {
        Ok(self.clone())
    }
}

impl ReferenceProvider for Vec<DiscoveredReference> {
    fn discover_references(&self) -> SnapshotResult<Vec<DiscoveredReference>> {
        Ok(self.clone())
    }
}

/// Read-only snapshot of the corpus, loaded once per run.
///
/// All listings are sorted by identifier, so repeated enumeration is deterministic.
#[derive(Clone, Debug, Default)]
pub struct CorpusIndex {
    samples: BTreeMap<SampleId, Sample>,
    unparsable: BTreeMap<SampleId, String>,
    references: BTreeMap<ReferenceId, ReferenceImage>,
    malformed: BTreeMap<String, String>,
    rejected: Vec<(String, String)>,
}

impl CorpusIndex {
    /// Enumerate both providers and build the index.
    #[tracing::instrument(skip_all)]
    pub fn load(
        samples: &dyn SampleProvider,
        references: &dyn ReferenceProvider,
    ) -> SnapshotResult<Self> {
        let samples = samples.discover_samples()?;
        let references = references.discover_references()?;
        let index = Self::from_parts(samples, references)?;
        tracing::info!(
            samples = index.sample_count(),
            references = index.reference_count(),
            "corpus loaded"
        );
        Ok(index)
    }

    /// Build an index from already discovered entries.
    ///
    /// A duplicate sample or reference identifier does not fail the build: the first entry is
    /// kept and each later one is recorded as rejected (samples) or malformed (references).
    pub fn from_parts(
        samples: Vec<DiscoveredSample>,
        references: Vec<DiscoveredReference>,
    ) -> SnapshotResult<Self> {
        let mut out = Self::default();

        for entry in samples {
            if let Some(id) = entry.id()
                && out.contains_sample(id.as_str())
            {
                tracing::warn!(sample = %id, "duplicate sample id");
                out.rejected
                    .push((id.to_string(), format!("duplicate sample id '{id}'")));
                continue;
            }
            match entry {
                DiscoveredSample::Ready(sample) => {
                    out.samples.insert(sample.id.clone(), sample);
                }
                DiscoveredSample::Unparsable { id, reason } => {
                    tracing::warn!(sample = %id, %reason, "sample could not be parsed");
                    out.unparsable.insert(id, reason);
                }
                DiscoveredSample::Rejected { name, reason } => {
                    tracing::warn!(%name, %reason, "sample file rejected");
                    out.rejected.push((name, reason));
                }
            }
        }
        out.rejected.sort();

        for entry in references {
            match entry {
                DiscoveredReference::Ready(reference) => {
                    if out.references.contains_key(&reference.id) {
                        tracing::warn!(reference = %reference.id, "duplicate reference image");
                        out.malformed.insert(
                            reference.id.to_string(),
                            format!("duplicate reference image '{}'", reference.id),
                        );
                        continue;
                    }
                    out.references.insert(reference.id.clone(), reference);
                }
                DiscoveredReference::Malformed { name, reason } => {
                    tracing::warn!(%name, %reason, "reference image is malformed");
                    out.malformed.insert(name, reason);
                }
            }
        }

        Ok(out)
    }

    /// Samples with a readable header, sorted by id.
    pub fn list_samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.values()
    }

    /// Reference images, sorted by `(sample, checkpoint)`.
    pub fn list_reference_images(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.references.values()
    }

    /// Samples that exist but could not be parsed, with the parser message.
    pub fn unparsable_samples(&self) -> impl Iterator<Item = (&SampleId, &str)> {
        self.unparsable.iter().map(|(id, r)| (id, r.as_str()))
    }

    /// Stored sample files that were left out of the corpus, with the reason, sorted by name.
    pub fn rejected_samples(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rejected
            .iter()
            .map(|(name, r)| (name.as_str(), r.as_str()))
    }

    /// Stored reference files that could not be interpreted, with the reason.
    pub fn malformed_references(&self) -> impl Iterator<Item = (&str, &str)> {
        self.malformed
            .iter()
            .map(|(name, r)| (name.as_str(), r.as_str()))
    }

    /// Every sample id in the corpus, parsed or not, sorted.
    pub fn sample_ids(&self) -> Vec<&SampleId> {
        let mut ids: Vec<&SampleId> = self.samples.keys().chain(self.unparsable.keys()).collect();
        ids.sort();
        ids
    }

    /// Whether `id` names a sample in the corpus (parsed or not).
    pub fn contains_sample(&self, id: &str) -> bool {
        self.samples.contains_key(id) || self.unparsable.contains_key(id)
    }

    /// Look up a parsed sample.
    pub fn sample(&self, id: &str) -> Option<&Sample> {
        self.samples.get(id)
    }

    /// Parser message for an unparsable sample.
    pub fn unparsable_reason(&self, id: &str) -> Option<&str> {
        self.unparsable.get(id).map(String::as_str)
    }

    /// Look up the baseline for `(sample, checkpoint)`.
    pub fn reference(&self, sample: &SampleId, checkpoint: Checkpoint) -> Option<&ReferenceImage> {
        self.references
            .get(&ReferenceId::new(sample.clone(), checkpoint))
    }

    /// Number of samples, parsed or not.
    pub fn sample_count(&self) -> usize {
        self.samples.len() + self.unparsable.len()
    }

    /// Number of well-formed reference images.
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/index.rs"]
mod tests;
