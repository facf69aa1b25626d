use crate::{
    foundation::core::FrameRGBA,
    run::collab::{ImageComparator, ImageMatch},
};

/// Default comparator: similarity is the fraction of pixels whose RGBA channels all lie within
/// `channel_tolerance` of the baseline.
///
/// Frames of different dimensions never match and report a similarity of `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelComparator {
    /// Maximum allowed difference per color channel (0-255).
    pub channel_tolerance: u8,
}

impl PixelComparator {
    /// Exact comparison: every channel must match.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Sets the channel tolerance.
    pub fn with_channel_tolerance(mut self, tolerance: u8) -> Self {
        self.channel_tolerance = tolerance;
        self
    }

    /// Fraction of matching pixels in `[0, 1]`.
    pub fn similarity(&self, actual: &FrameRGBA, expected: &FrameRGBA) -> f64 {
        if actual.width != expected.width
            || actual.height != expected.height
            || actual.data.len() != expected.data.len()
        {
            return 0.0;
        }

        let total = actual.data.len() / 4;
        if total == 0 {
            return 1.0;
        }

        let tol = self.channel_tolerance;
        let matching = actual
            .data
            .chunks_exact(4)
            .zip(expected.data.chunks_exact(4))
            .filter(|(a, e)| a.iter().zip(e.iter()).all(|(&x, &y)| x.abs_diff(y) <= tol))
            .count();

        matching as f64 / total as f64
    }
}

impl ImageComparator for PixelComparator {
    fn compare(&self, actual: &FrameRGBA, expected: &FrameRGBA, precision: f64) -> ImageMatch {
        let similarity = self.similarity(actual, expected);
        ImageMatch {
            matched: similarity >= precision,
            similarity: Some(similarity),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compare/pixel.rs"]
mod tests;
