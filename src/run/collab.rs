use crate::{
    corpus::index::Sample,
    foundation::core::{FrameRGBA, RenderSize, RenderVariant},
};

/// Why a sample could not be turned into pixels at one checkpoint.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "stage", content = "message", rename_all = "snake_case")]
pub enum RenderError {
    /// The animation description could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The description parsed but rasterization failed.
    #[error("raster error: {0}")]
    Raster(String),
}

impl RenderError {
    /// Build a [`RenderError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`RenderError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }
}

/// Renders a sample at a timeline position.
///
/// Implementations are shared across worker threads during parallel runs.
pub trait FrameRenderer: Send + Sync {
    /// Render `sample` at `progress` in `[0, 1]`, scaled to `size`, with the backend for `variant`.
    fn render(
        &self,
        sample: &Sample,
        progress: f64,
        size: RenderSize,
        variant: RenderVariant,
    ) -> Result<FrameRGBA, RenderError>;
}

/// Outcome of comparing a rendered frame against its baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageMatch {
    /// Whether the frames match at the requested precision.
    pub matched: bool,
    /// Measured similarity in `[0, 1]`, when the comparator reports one.
    pub similarity: Option<f64>,
}

/// Pixel-level comparison between an actual and an expected frame.
pub trait ImageComparator: Send + Sync {
    /// Compare `actual` against `expected`; `precision` is the minimum similarity to match.
    fn compare(&self, actual: &FrameRGBA, expected: &FrameRGBA, precision: f64) -> ImageMatch;
}

/// Gate consulted once before a run; rendered output is only comparable to the stored baselines
/// when it passes.
pub trait EnvironmentCheck {
    /// Whether this environment produces deterministic, comparable output.
    fn is_supported(&self) -> bool;

    /// Message reported when [`EnvironmentCheck::is_supported`] returns `false`.
    fn describe(&self) -> String {
        "execution environment does not meet the snapshot precondition".to_string()
    }
}

impl<F> EnvironmentCheck for F
where
    F: Fn() -> bool,
{
    fn is_supported(&self) -> bool {
        self()
    }
}

/// Environment gate with a fixed answer.
#[derive(Clone, Copy, Debug)]
pub struct FixedEnvironment(pub bool);

impl EnvironmentCheck for FixedEnvironment {
    fn is_supported(&self) -> bool {
        self.0
    }
}
