use base64::{engine::general_purpose, Engine as _};
use log::warn;

use crate::host::{RasterRequest, SceneHost};
use crate::scene::SceneNode;

/// Embeds rasterized nodes as base64 data URIs
///
/// This is the pipeline's single declared point of asynchronous
/// fallibility, and the failure is contained right here: any error from the
/// host renderer is logged and turned into an absent result, never
/// propagated. Every caller has to handle the `None` branch explicitly.
pub struct ImageExporter<'a> {
    host: &'a dyn SceneHost,
}

impl<'a> ImageExporter<'a> {
    pub fn new(host: &'a dyn SceneHost) -> Self {
        Self { host }
    }

    /// Rasterize `node` through the host and encode the bytes as a data URI
    ///
    /// Single attempt, no retry. Returns `None` when the host renderer
    /// fails for any reason.
    pub async fn export_as_image(
        &self,
        node: &SceneNode,
        request: &RasterRequest,
    ) -> Option<String> {
        match self.host.rasterize(node, request).await {
            Ok(bytes) => Some(data_uri(request.format.mime_type(), &bytes)),
            Err(err) => {
                warn!(
                    "image export failed for node {} ({:?}): {}",
                    node.id, node.name, err
                );
                None
            }
        }
    }
}

/// Build a `data:<mime>;base64,<payload>` URI
fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}
