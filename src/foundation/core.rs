use std::{borrow::Borrow, fmt};

use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Stable, case-sensitive sample identifier.
///
/// Identifiers never contain path separators; discovery flattens nested corpus paths with `-`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SampleId(String);

impl SampleId {
    /// Build a [`SampleId`], rejecting empty identifiers and identifiers with path separators.
    pub fn new(raw: impl Into<String>) -> SnapshotResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SnapshotError::validation("sample id must be non-empty"));
        }
        if raw.contains(['/', '\\']) {
            return Err(SnapshotError::validation(format!(
                "sample id '{raw}' must not contain path separators"
            )));
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SampleId {
    type Error = SnapshotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SampleId> for String {
    fn from(value: SampleId) -> Self {
        value.0
    }
}

impl Borrow<str> for SampleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed fractional timeline position at which a sample is rendered.
///
/// Ordering follows progress, so sorting checkpoints yields timeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Checkpoint {
    /// Progress `0.0`.
    Start,
    /// Progress `0.25`.
    Quarter,
    /// Progress `0.5`.
    Half,
    /// Progress `0.75`.
    ThreeQuarters,
    /// Progress `1.0`.
    End,
}

impl Checkpoint {
    /// All checkpoints in increasing progress order.
    pub const ALL: [Checkpoint; 5] = [
        Checkpoint::Start,
        Checkpoint::Quarter,
        Checkpoint::Half,
        Checkpoint::ThreeQuarters,
        Checkpoint::End,
    ];

    /// Whole-number percentage of the timeline.
    pub fn percent(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarters => 75,
            Self::End => 100,
        }
    }

    /// Progress in `[0, 1]`.
    pub fn progress(self) -> f64 {
        f64::from(self.percent()) / 100.0
    }

    /// Label used in reference image names (`"0%"`, `"25%"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "0%",
            Self::Quarter => "25%",
            Self::Half => "50%",
            Self::ThreeQuarters => "75%",
            Self::End => "100%",
        }
    }

    /// Parse a checkpoint label produced by [`Checkpoint::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl serde::Serialize for Checkpoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Rendering backend configuration a sample is evaluated under.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderVariant {
    /// Primary backend; every sample runs under it.
    Default,
    /// Secondary backend; only samples whose configuration opts in run under it.
    Alternate,
}

impl fmt::Display for RenderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Alternate => f.write_str("alternate"),
        }
    }
}

/// Width/height pair in render units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderSize {
    /// Width, always positive.
    pub width: f64,
    /// Height, always positive.
    pub height: f64,
}

impl RenderSize {
    /// Build a size, rejecting non-finite or non-positive dimensions.
    pub fn new(width: f64, height: f64) -> SnapshotResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SnapshotError::validation(format!(
                "size must be positive and finite, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// `width / height`.
    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// Pixel dimensions, rounded and at least one pixel on each side.
    pub fn pixel_dims(self) -> (u32, u32) {
        fn px(v: f64) -> u32 {
            (v.round() as u32).max(1)
        }
        (px(self.width), px(self.height))
    }
}

/// A rendered or decoded frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Build a frame, checking that `data` holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SnapshotResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(SnapshotError::validation(format!(
                "frame {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(px),
        }
    }

    /// Convert from an `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
        }
    }

    /// Convert into an `image` buffer.
    pub fn into_rgba_image(self) -> SnapshotResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| SnapshotError::validation("frame buffer does not match its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
