//! Injected host capability.
//!
//! The scene graph and the renderer belong to the host application; the
//! pipeline only ever sees them through [`SceneHost`]. Keeping the capability
//! explicit (instead of ambient) is what makes extraction testable without a
//! live host: tests run against [`StaticHost`], the CLI against [`FileHost`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ExportError, Result};
use crate::scene::SceneNode;

/// Raster output format understood by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl ImageFormat {
    /// MIME type used in emitted data URIs
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpg => "image/jpeg",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// File extension used by file-backed hosts
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Parameters of a single rasterization request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    pub format: ImageFormat,
    pub scale: f64,
}

impl Default for RasterRequest {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            scale: 1.0,
        }
    }
}

impl RasterRequest {
    /// PNG at the given scale
    pub fn png_at_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

/// Read-only access to the host document plus its rendering capability
///
/// `rasterize` is the pipeline's single point of asynchronous fallibility.
/// It is single-attempt and has no timeout: a stalled host renderer stalls
/// the extraction, which is acceptable because the capability is host-owned.
#[async_trait]
pub trait SceneHost: Send + Sync {
    /// The current selection of root nodes, in declared order
    fn selection(&self) -> &[SceneNode];

    /// Render `node` to image bytes in the requested format and scale
    async fn rasterize(&self, node: &SceneNode, request: &RasterRequest) -> Result<Vec<u8>>;
}

/// In-memory host: a fixed selection plus preregistered raster bytes
///
/// Rasterization succeeds only for node ids registered via
/// [`StaticHost::with_image`]; everything else fails, which is exactly the
/// contained-failure path callers must handle.
#[derive(Debug, Default)]
pub struct StaticHost {
    selection: Vec<SceneNode>,
    images: HashMap<String, Vec<u8>>,
}

impl StaticHost {
    pub fn new(selection: Vec<SceneNode>) -> Self {
        Self {
            selection,
            images: HashMap::new(),
        }
    }

    /// Register raster bytes served for the given node id
    pub fn with_image(mut self, node_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.images.insert(node_id.into(), bytes);
        self
    }
}

#[async_trait]
impl SceneHost for StaticHost {
    fn selection(&self) -> &[SceneNode] {
        &self.selection
    }

    async fn rasterize(&self, node: &SceneNode, _request: &RasterRequest) -> Result<Vec<u8>> {
        self.images
            .get(&node.id)
            .cloned()
            .ok_or_else(|| ExportError::Rasterization {
                node_id: node.id.clone(),
                reason: "no raster registered for node".to_string(),
            })
    }
}

/// Scene snapshot file shape: `{"selection": [node, ...]}`
#[derive(Debug, Deserialize)]
struct Snapshot {
    selection: Vec<SceneNode>,
}

/// File-backed host used by the CLI
///
/// The selection comes from a JSON snapshot; rasterizations are served from
/// an optional sidecar directory holding pre-rendered `<node id>.<ext>`
/// files. The requested scale is ignored here since the files are rendered
/// ahead of time. A missing directory or file is an ordinary rasterization
/// failure, contained upstream like any other.
#[derive(Debug)]
pub struct FileHost {
    selection: Vec<SceneNode>,
    images_dir: Option<PathBuf>,
}

impl FileHost {
    /// Load a snapshot from `scene_path`
    pub fn load(scene_path: &Path, images_dir: Option<PathBuf>) -> Result<Self> {
        let bytes = fs::read(scene_path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        Ok(Self {
            selection: snapshot.selection,
            images_dir,
        })
    }
}

#[async_trait]
impl SceneHost for FileHost {
    fn selection(&self) -> &[SceneNode] {
        &self.selection
    }

    async fn rasterize(&self, node: &SceneNode, request: &RasterRequest) -> Result<Vec<u8>> {
        let dir = self
            .images_dir
            .as_ref()
            .ok_or_else(|| ExportError::Rasterization {
                node_id: node.id.clone(),
                reason: "no image directory configured".to_string(),
            })?;
        let path = dir.join(format!("{}.{}", node.id, request.format.extension()));
        fs::read(&path).map_err(|err| ExportError::Rasterization {
            node_id: node.id.clone(),
            reason: format!("{}: {}", path.display(), err),
        })
    }
}
