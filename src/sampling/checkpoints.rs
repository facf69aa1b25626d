use crate::{
    config::resolver::{ConfigResolver, SnapshotConfiguration},
    foundation::{
        core::{Checkpoint, RenderSize, RenderVariant},
        error::{SnapshotError, SnapshotResult},
    },
};

/// Upper bound on the larger side of a rendered snapshot.
pub const MAX_OUTPUT_DIMENSION: f64 = 500.0;

/// Checkpoints to exercise for a sample with configuration `cfg` under `variant`.
///
/// Samples that have not opted into the alternate variant are skipped for it (empty slice).
pub fn select_checkpoints(
    cfg: &SnapshotConfiguration,
    variant: RenderVariant,
) -> &'static [Checkpoint] {
    match variant {
        RenderVariant::Alternate if !cfg.runs_under_alternate_variant => &[],
        RenderVariant::Default | RenderVariant::Alternate => &Checkpoint::ALL,
    }
}

/// Computes per-sample work: which checkpoints to render and at what size.
#[derive(Clone, Copy, Debug)]
pub struct CheckpointSampler<'a> {
    resolver: &'a ConfigResolver,
    max_dimension: f64,
}

impl<'a> CheckpointSampler<'a> {
    /// Sampler capped at [`MAX_OUTPUT_DIMENSION`].
    pub fn new(resolver: &'a ConfigResolver) -> Self {
        Self {
            resolver,
            max_dimension: MAX_OUTPUT_DIMENSION,
        }
    }

    /// Sampler with a custom cap on the larger output side.
    pub fn with_max_dimension(
        resolver: &'a ConfigResolver,
        max_dimension: f64,
    ) -> SnapshotResult<Self> {
        if !(max_dimension.is_finite() && max_dimension > 0.0) {
            return Err(SnapshotError::validation(format!(
                "max output dimension must be positive, got {max_dimension}"
            )));
        }
        Ok(Self {
            resolver,
            max_dimension,
        })
    }

    /// Cap on the larger output side.
    pub fn max_dimension(&self) -> f64 {
        self.max_dimension
    }

    /// Ordered checkpoints for `sample_id` under `variant`; empty when the sample is skipped.
    pub fn checkpoints_for(&self, sample_id: &str, variant: RenderVariant) -> &'static [Checkpoint] {
        select_checkpoints(&self.resolver.resolve(sample_id), variant)
    }

    /// Aspect-preserving render size whose larger side is at most the cap.
    ///
    /// The larger side is clamped (width wins only when strictly larger) and the other side is
    /// derived from the aspect ratio. Samples already within the cap keep their size.
    pub fn output_size_for(&self, size: RenderSize) -> RenderSize {
        let aspect = size.aspect_ratio();
        if size.width > size.height {
            let width = size.width.min(self.max_dimension);
            RenderSize {
                width,
                height: width / aspect,
            }
        } else {
            let height = size.height.min(self.max_dimension);
            RenderSize {
                width: height * aspect,
                height,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/checkpoints.rs"]
mod tests;
