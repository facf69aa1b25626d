//! Visual-regression harness for Wavyte animation samples.
//!
//! A corpus of animation samples is rendered at fixed timeline checkpoints and every frame is
//! compared against a stored reference image. The corpus itself is also checked for drift:
//! reference images and configuration overrides must point at samples that still exist.
//!
//! # Pipeline overview
//!
//! 1. **Index**: `SampleProvider + ReferenceProvider -> CorpusIndex` (loaded once, read-only)
//! 2. **Resolve**: `sample id -> SnapshotConfiguration` (override over default)
//! 3. **Sample**: `(sample, variant) -> checkpoints + output size`
//! 4. **Run**: render + compare every selected item -> `RunReport`
//!
//! [`CorpusValidator`] runs independently over the same [`CorpusIndex`].
//!
//! Rendering, pixel diffing and environment gating are collaborators injected through
//! [`FrameRenderer`], [`ImageComparator`] and [`EnvironmentCheck`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod compare;
mod config;
mod corpus;
mod foundation;
mod run;
mod sampling;
mod validate;

pub use compare::pixel::PixelComparator;
pub use config::harness::HarnessConfig;
pub use config::resolver::{ConfigResolver, OverrideTable, SnapshotConfiguration};
pub use corpus::fs::{FsCorpus, FsSampleSource};
pub use corpus::index::{
    CorpusIndex, DiscoveredReference, DiscoveredSample, ReferenceId, ReferenceImage,
    ReferenceProvider, Sample, SampleHandle, SampleProvider,
};
pub use foundation::core::{Checkpoint, FrameRGBA, RenderSize, RenderVariant, SampleId};
pub use foundation::error::{SnapshotError, SnapshotResult};
pub use run::collab::{
    EnvironmentCheck, FixedEnvironment, FrameRenderer, ImageComparator, ImageMatch, RenderError,
};
pub use run::report::{ComparisonResult, FailureKind, ItemFailure, RunReport, RunSummary};
pub use run::runner::{RunOptions, SnapshotRunner};
pub use sampling::checkpoints::{CheckpointSampler, MAX_OUTPUT_DIMENSION, select_checkpoints};
pub use validate::validator::{CorpusPart, CorpusValidator, IntegrityReport, IntegrityViolation};
