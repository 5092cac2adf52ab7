//! The UI message boundary.
//!
//! Inbound requests and outbound messages mirror the plugin wire schema:
//! `export-raw` / `export-canvas` / `cancel` in, `error` / `progress` /
//! `result` out. The channel itself is host plumbing; this module only
//! defines the envelopes and drives the pipeline for one request.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::canvas;
use crate::error::{ExportError, Result};
use crate::extract::{ExtractOptions, NodeExtractor, ProgressSink};
use crate::host::SceneHost;

/// Inbound UI request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "export-raw", rename_all = "camelCase")]
    ExportRaw {
        export_images: Option<bool>,
        image_scale: Option<f64>,
        include_hidden: Option<bool>,
    },
    #[serde(rename = "export-canvas", rename_all = "camelCase")]
    ExportCanvas {
        /// Accepted on the wire but ignored: canvas export always embeds
        /// image data
        export_images: Option<bool>,
        image_scale: Option<f64>,
        include_hidden: Option<bool>,
    },
    #[serde(rename = "cancel")]
    Cancel,
}

/// Which serialized form a result carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Raw,
    Canvas,
}

/// Outbound UI message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    Error {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Progress {
        current: usize,
        total: usize,
        node_name: String,
    },
    Result {
        format: ExportFormat,
        data: JsonValue,
    },
}

/// Where outbound messages go; the host wires this to its UI channel
pub trait MessageSink: Send {
    fn send(&mut self, message: Response);
}

/// Every message sink doubles as the extractor's progress sink
impl<S: MessageSink> ProgressSink for S {
    fn root_extracted(&mut self, current: usize, total: usize, name: &str) {
        self.send(Response::Progress {
            current,
            total,
            node_name: name.to_string(),
        });
    }
}

/// Sink that collects messages in memory, for tests and batch callers
#[derive(Debug, Default)]
pub struct MemorySink {
    pub messages: Vec<Response>,
}

impl MessageSink for MemorySink {
    fn send(&mut self, message: Response) {
        self.messages.push(message);
    }
}

/// Handle one inbound request end to end
///
/// An empty selection is reported as a single `error` message and is not an
/// error of this function; anything else unexpected propagates. `cancel` is
/// acknowledged silently since teardown belongs to the host lifecycle.
pub async fn handle_request<S: MessageSink>(
    host: &dyn SceneHost,
    request: Request,
    sink: &mut S,
) -> Result<()> {
    match request {
        Request::Cancel => Ok(()),
        Request::ExportRaw {
            export_images,
            image_scale,
            include_hidden,
        } => {
            let options = ExtractOptions {
                export_images: export_images.unwrap_or(false),
                image_scale: image_scale.unwrap_or(1.0),
                include_hidden: include_hidden.unwrap_or(false),
            };
            run_export(host, options, ExportFormat::Raw, sink).await
        }
        Request::ExportCanvas {
            export_images: _,
            image_scale,
            include_hidden,
        } => {
            let options = ExtractOptions {
                export_images: true,
                image_scale: image_scale.unwrap_or(1.0),
                include_hidden: include_hidden.unwrap_or(false),
            };
            run_export(host, options, ExportFormat::Canvas, sink).await
        }
    }
}

async fn run_export<S: MessageSink>(
    host: &dyn SceneHost,
    options: ExtractOptions,
    format: ExportFormat,
    sink: &mut S,
) -> Result<()> {
    let extractor = NodeExtractor::new(host);
    let roots = match extractor.collect_selection(&options, &mut *sink).await {
        Ok(roots) => roots,
        Err(err @ ExportError::EmptySelection) => {
            sink.send(Response::Error {
                message: err.to_string(),
            });
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let data = match format {
        ExportFormat::Raw => serde_json::to_value(&roots)?,
        ExportFormat::Canvas => serde_json::to_value(canvas::convert(&roots))?,
    };
    sink.send(Response::Result { format, data });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;
    use crate::scene::SceneNode;
    use serde_json::json;

    fn node(value: JsonValue) -> SceneNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_value(json!({
            "type": "export-canvas",
            "imageScale": 2.0,
            "includeHidden": true
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::ExportCanvas {
                export_images: None,
                image_scale: Some(2.0),
                include_hidden: Some(true),
            }
        );

        let cancel: Request = serde_json::from_value(json!({ "type": "cancel" })).unwrap();
        assert_eq!(cancel, Request::Cancel);
    }

    #[test]
    fn test_response_wire_format() {
        let progress = Response::Progress {
            current: 1,
            total: 3,
            node_name: "Frame 1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&progress).unwrap(),
            json!({ "type": "progress", "current": 1, "total": 3, "nodeName": "Frame 1" })
        );

        let error = Response::Error {
            message: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "type": "error", "message": "boom" })
        );
    }

    #[tokio::test]
    async fn test_empty_selection_sends_one_error_and_nothing_else() {
        let host = StaticHost::new(vec![]);
        let mut sink = MemorySink::default();

        handle_request(
            &host,
            Request::ExportRaw {
                export_images: None,
                image_scale: None,
                include_hidden: None,
            },
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(sink.messages.len(), 1);
        assert!(matches!(&sink.messages[0], Response::Error { .. }));
    }

    #[tokio::test]
    async fn test_raw_export_sends_progress_then_result() {
        let host = StaticHost::new(vec![
            node(json!({ "id": "1:1", "name": "a", "type": "RECTANGLE",
                         "width": 10.0, "height": 10.0 })),
            node(json!({ "id": "1:2", "name": "b", "type": "RECTANGLE",
                         "width": 10.0, "height": 10.0 })),
        ]);
        let mut sink = MemorySink::default();

        handle_request(
            &host,
            Request::ExportRaw {
                export_images: None,
                image_scale: None,
                include_hidden: None,
            },
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(sink.messages.len(), 3);
        assert_eq!(
            sink.messages[0],
            Response::Progress {
                current: 1,
                total: 2,
                node_name: "a".to_string()
            }
        );
        assert_eq!(
            sink.messages[1],
            Response::Progress {
                current: 2,
                total: 2,
                node_name: "b".to_string()
            }
        );
        match &sink.messages[2] {
            Response::Result { format, data } => {
                assert_eq!(*format, ExportFormat::Raw);
                assert_eq!(data.as_array().unwrap().len(), 2);
            }
            other => panic!("expected result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_canvas_export_forces_image_embedding() {
        let host = StaticHost::new(vec![node(json!({
            "id": "2:1", "name": "Frame", "type": "FRAME",
            "width": 10.0, "height": 10.0
        }))])
        .with_image("2:1", vec![1, 2, 3]);
        let mut sink = MemorySink::default();

        // export_images explicitly false on the wire, still embedded
        handle_request(
            &host,
            Request::ExportCanvas {
                export_images: Some(false),
                image_scale: None,
                include_hidden: None,
            },
            &mut sink,
        )
        .await
        .unwrap();

        let Some(Response::Result { format, data }) = sink.messages.last() else {
            panic!("expected a result message");
        };
        assert_eq!(*format, ExportFormat::Canvas);
        assert_eq!(data["version"], "5.3.0");
        assert_eq!(data["background"], "#ffffff");
        // The frame resolved a whole-node image, so it converts as one
        assert_eq!(data["objects"][0]["type"], "image");
        assert_eq!(
            data["objects"][0]["src"],
            "data:image/png;base64,AQID"
        );
    }

    #[tokio::test]
    async fn test_cancel_sends_nothing() {
        let host = StaticHost::new(vec![]);
        let mut sink = MemorySink::default();

        handle_request(&host, Request::Cancel, &mut sink)
            .await
            .unwrap();

        assert!(sink.messages.is_empty());
    }
}
