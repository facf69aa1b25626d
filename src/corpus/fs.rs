use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    corpus::index::{
        DiscoveredReference, DiscoveredSample, ReferenceId, ReferenceImage, ReferenceProvider,
        Sample, SampleHandle, SampleProvider,
    },
    foundation::{
        core::{FrameRGBA, RenderSize, SampleId},
        error::{SnapshotError, SnapshotResult},
    },
};

/// Source content stored in a [`SampleHandle`] by [`FsCorpus`].
#[derive(Clone, Debug)]
pub struct FsSampleSource {
    /// Location of the sample on disk.
    pub path: PathBuf,
    /// Raw composition JSON, for the renderer to parse.
    pub json: Arc<str>,
}

#[derive(serde::Deserialize)]
struct SampleHeader {
    canvas: CanvasHeader,
}

#[derive(serde::Deserialize)]
struct CanvasHeader {
    width: f64,
    height: f64,
}

/// Directory-backed corpus.
///
/// - samples: `*.json` composition files anywhere under `samples_root`; the id is the relative
///   path without extension with components joined by `-` (`Issues/issue_1169.json` becomes
///   `Issues-issue_1169`). A file whose id is invalid or already taken by an earlier file
///   (in path order) is reported as [`DiscoveredSample::Rejected`].
/// - references: `*.png` files directly under `references_root`, named
///   `<sample id>-<checkpoint label>.png`.
#[derive(Clone, Debug)]
pub struct FsCorpus {
    samples_root: PathBuf,
    references_root: Option<PathBuf>,
}

impl FsCorpus {
    /// Build a corpus over two directories.
    pub fn new(samples_root: impl Into<PathBuf>, references_root: impl Into<PathBuf>) -> Self {
        Self {
            samples_root: samples_root.into(),
            references_root: Some(references_root.into()),
        }
    }

    /// Build a corpus with samples only; it discovers no reference images.
    pub fn samples_only(samples_root: impl Into<PathBuf>) -> Self {
        Self {
            samples_root: samples_root.into(),
            references_root: None,
        }
    }

    /// Root searched for sample files.
    pub fn samples_root(&self) -> &Path {
        &self.samples_root
    }

    /// Root searched for reference images, if any.
    pub fn references_root(&self) -> Option<&Path> {
        self.references_root.as_deref()
    }
}

impl SampleProvider for FsCorpus {
    fn discover_samples(&self) -> SnapshotResult<Vec<DiscoveredSample>> {
        let mut files = Vec::new();
        collect_files(&self.samples_root, "json", true, &mut files).map_err(unavailable)?;
        files.sort();

        let mut out = Vec::with_capacity(files.len());
        let mut seen: BTreeMap<SampleId, String> = BTreeMap::new();
        for path in files {
            let name = relative_name(&self.samples_root, &path)?;
            let id = match sample_id_for(&name) {
                Ok(id) => id,
                Err(e) => {
                    out.push(DiscoveredSample::Rejected {
                        name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if let Some(first) = seen.get(&id) {
                out.push(DiscoveredSample::Rejected {
                    reason: format!("sample id '{id}' is already used by '{first}'"),
                    name,
                });
                continue;
            }
            seen.insert(id.clone(), name);

            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("read sample '{}'", path.display()))
                .map_err(unavailable)?;
            match parse_header(&json) {
                Ok(size) => out.push(DiscoveredSample::Ready(Sample {
                    id,
                    size,
                    handle: SampleHandle::new(FsSampleSource {
                        path,
                        json: Arc::from(json),
                    }),
                })),
                Err(e) => out.push(DiscoveredSample::Unparsable {
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(out)
    }
}

impl ReferenceProvider for FsCorpus {
    fn discover_references(&self) -> SnapshotResult<Vec<DiscoveredReference>> {
        let Some(root) = &self.references_root else {
            return Ok(Vec::new());
        };
        let mut files = Vec::new();
        collect_files(root, "png", false, &mut files).map_err(unavailable)?;
        files.sort();

        let mut out = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let id = match ReferenceId::parse(&name) {
                Ok(id) => id,
                Err(e) => {
                    out.push(DiscoveredReference::Malformed {
                        name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match image::open(&path) {
                Ok(img) => out.push(DiscoveredReference::Ready(ReferenceImage {
                    id,
                    image: FrameRGBA::from_rgba_image(img.to_rgba8()),
                })),
                Err(e) => out.push(DiscoveredReference::Malformed {
                    name,
                    reason: format!("decode png: {e}"),
                }),
            }
        }
        Ok(out)
    }
}

fn parse_header(json: &str) -> SnapshotResult<RenderSize> {
    let header: SampleHeader =
        serde_json::from_str(json).map_err(|e| SnapshotError::serde(e.to_string()))?;
    RenderSize::new(header.canvas.width, header.canvas.height)
}

/// `/`-joined path of `path` relative to `root`, with its extension.
fn relative_name(root: &Path, path: &Path) -> SnapshotResult<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        SnapshotError::corpus_unavailable(format!(
            "sample '{}' is outside '{}'",
            path.display(),
            root.display()
        ))
    })?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn sample_id_for(name: &str) -> SnapshotResult<SampleId> {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    SampleId::new(stem.replace('/', "-"))
}

fn collect_files(
    dir: &Path,
    ext: &str,
    recursive: bool,
    out: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat '{}'", path.display()))?;
        if file_type.is_dir() {
            if recursive {
                collect_files(&path, ext, recursive, out)?;
            }
        } else if path.extension().is_some_and(|e| e == ext) {
            out.push(path);
        }
    }
    Ok(())
}

fn unavailable(e: anyhow::Error) -> SnapshotError {
    SnapshotError::corpus_unavailable(format!("{e:#}"))
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/fs.rs"]
mod tests;
