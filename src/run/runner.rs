use rayon::prelude::*;

use crate::{
    config::resolver::ConfigResolver,
    corpus::index::{CorpusIndex, Sample},
    foundation::{
        core::{Checkpoint, RenderSize, RenderVariant, SampleId},
        error::{SnapshotError, SnapshotResult},
    },
    run::{
        collab::{EnvironmentCheck, FrameRenderer, ImageComparator, RenderError},
        report::{ComparisonResult, ItemFailure, RunReport},
    },
    sampling::checkpoints::{CheckpointSampler, MAX_OUTPUT_DIMENSION},
};

/// Threading controls for a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOptions {
    /// Render and compare items on a dedicated thread pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

/// Drives rendering and comparison across the corpus for one variant at a time.
///
/// Collaborators are borrowed for the lifetime of the runner; the corpus index and the
/// override table are never mutated.
pub struct SnapshotRunner<'a> {
    index: &'a CorpusIndex,
    resolver: &'a ConfigResolver,
    renderer: &'a dyn FrameRenderer,
    comparator: &'a dyn ImageComparator,
    environment: &'a dyn EnvironmentCheck,
    max_dimension: f64,
    options: RunOptions,
}

#[derive(Clone, Copy)]
enum Subject<'a> {
    Ready(&'a Sample, RenderSize),
    Unparsable(&'a str),
}

struct WorkItem<'a> {
    sample: &'a SampleId,
    checkpoint: Checkpoint,
    precision: f64,
    subject: Subject<'a>,
}

impl<'a> SnapshotRunner<'a> {
    /// Runner with sequential execution and the default output cap.
    pub fn new(
        index: &'a CorpusIndex,
        resolver: &'a ConfigResolver,
        renderer: &'a dyn FrameRenderer,
        comparator: &'a dyn ImageComparator,
        environment: &'a dyn EnvironmentCheck,
    ) -> Self {
        Self {
            index,
            resolver,
            renderer,
            comparator,
            environment,
            max_dimension: MAX_OUTPUT_DIMENSION,
            options: RunOptions::default(),
        }
    }

    /// Replace threading options.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the cap on the larger output side.
    pub fn with_max_dimension(mut self, max_dimension: f64) -> SnapshotResult<Self> {
        CheckpointSampler::with_max_dimension(self.resolver, max_dimension)?;
        self.max_dimension = max_dimension;
        Ok(self)
    }

    /// Run the default-variant regression.
    pub fn run_default(&self) -> SnapshotResult<RunReport> {
        self.run(RenderVariant::Default)
    }

    /// Run the alternate-variant regression.
    pub fn run_alternate(&self) -> SnapshotResult<RunReport> {
        self.run(RenderVariant::Alternate)
    }

    /// Render and compare every selected item for `variant`.
    ///
    /// Fails only when the environment precondition is unmet (before any rendering) or when the
    /// worker pool cannot be built. Per-item problems are recorded on the returned results.
    #[tracing::instrument(skip(self))]
    pub fn run(&self, variant: RenderVariant) -> SnapshotResult<RunReport> {
        if !self.environment.is_supported() {
            let msg = self.environment.describe();
            tracing::error!(%msg, "aborting snapshot run");
            return Err(SnapshotError::unsupported_environment(msg));
        }

        let items = self.plan(variant)?;
        tracing::info!(items = items.len(), "snapshot run planned");

        let evaluator = ItemEvaluator {
            index: self.index,
            renderer: self.renderer,
            comparator: self.comparator,
            variant,
        };
        let results = if self.options.parallel {
            let pool = build_thread_pool(self.options.threads)?;
            pool.install(|| {
                items
                    .par_iter()
                    .map(|item| evaluator.evaluate(item))
                    .collect::<Vec<_>>()
            })
        } else {
            items.iter().map(|item| evaluator.evaluate(item)).collect()
        };

        let report = RunReport { variant, results };
        let summary = report.summary();
        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failing.len(),
            "snapshot run finished"
        );
        Ok(report)
    }

    fn plan(&self, variant: RenderVariant) -> SnapshotResult<Vec<WorkItem<'a>>> {
        let sampler = CheckpointSampler::with_max_dimension(self.resolver, self.max_dimension)?;
        let mut items = Vec::new();

        for id in self.index.sample_ids() {
            let checkpoints = sampler.checkpoints_for(id.as_str(), variant);
            if checkpoints.is_empty() {
                tracing::debug!(sample = %id, "sample not selected for this variant");
                continue;
            }

            let precision = self.resolver.resolve(id.as_str()).precision;
            let subject = match self.index.sample(id.as_str()) {
                Some(sample) => Subject::Ready(sample, sampler.output_size_for(sample.size)),
                None => Subject::Unparsable(
                    self.index
                        .unparsable_reason(id.as_str())
                        .unwrap_or("sample could not be parsed"),
                ),
            };

            for &checkpoint in checkpoints {
                items.push(WorkItem {
                    sample: id,
                    checkpoint,
                    precision,
                    subject,
                });
            }
        }
        Ok(items)
    }
}

#[derive(Clone, Copy)]
struct ItemEvaluator<'a> {
    index: &'a CorpusIndex,
    renderer: &'a dyn FrameRenderer,
    comparator: &'a dyn ImageComparator,
    variant: RenderVariant,
}

impl ItemEvaluator<'_> {
    fn evaluate(&self, item: &WorkItem<'_>) -> ComparisonResult {
        let variant = self.variant;
        let rendered = match &item.subject {
            Subject::Ready(sample, size) => {
                self.renderer
                    .render(sample, item.checkpoint.progress(), *size, variant)
            }
            Subject::Unparsable(reason) => Err(RenderError::parse(*reason)),
        };

        let mut result = ComparisonResult {
            sample: item.sample.clone(),
            checkpoint: item.checkpoint,
            variant,
            similarity: None,
            failure: None,
        };

        let actual = match rendered {
            Ok(frame) => frame,
            Err(error) => {
                tracing::warn!(
                    sample = %item.sample,
                    checkpoint = %item.checkpoint,
                    %error,
                    "render failed"
                );
                result.failure = Some(ItemFailure::RenderFailure { error });
                return result;
            }
        };

        let Some(reference) = self.index.reference(item.sample, item.checkpoint) else {
            tracing::warn!(
                sample = %item.sample,
                checkpoint = %item.checkpoint,
                "no reference image"
            );
            result.failure = Some(ItemFailure::MissingBaseline);
            return result;
        };

        let m = self
            .comparator
            .compare(&actual, &reference.image, item.precision);
        result.similarity = m.similarity;
        if m.matched {
            tracing::debug!(sample = %item.sample, checkpoint = %item.checkpoint, "matched");
        } else {
            tracing::warn!(
                sample = %item.sample,
                checkpoint = %item.checkpoint,
                similarity = ?m.similarity,
                precision = item.precision,
                "snapshot mismatch"
            );
            result.failure = Some(ItemFailure::ComparisonMismatch {
                precision: item.precision,
            });
        }
        result
    }
}

fn build_thread_pool(threads: Option<usize>) -> SnapshotResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SnapshotError::validation(
            "run option 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SnapshotError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/run/runner.rs"]
mod tests;
