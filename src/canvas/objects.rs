//! The fabric.js 5.3.0 output schema.
//!
//! Field sets are fixed per object type, matching what fabric's
//! `canvas.loadFromJSON` expects; nothing here is uniformly optional.

use serde::Serialize;

/// Schema version tag stamped on the document and every object
pub const FABRIC_VERSION: &str = "5.3.0";

/// Canvas background color of the emitted document
pub const BACKGROUND: &str = "#ffffff";

/// Fields shared by every emitted object type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCommon {
    pub version: String,
    pub origin_x: String,
    pub origin_y: String,
    pub left: f64,
    pub top: f64,
    pub angle: f64,
    pub opacity: f64,
    pub visible: bool,
    pub name: String,
    pub id: String,
}

/// One fabric canvas object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasObject {
    #[serde(rename_all = "camelCase")]
    Rect {
        #[serde(flatten)]
        common: ObjectCommon,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
        rx: f64,
        ry: f64,
    },
    #[serde(rename_all = "camelCase")]
    Circle {
        #[serde(flatten)]
        common: ObjectCommon,
        radius: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Ellipse {
        #[serde(flatten)]
        common: ObjectCommon,
        rx: f64,
        ry: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(flatten)]
        common: ObjectCommon,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
        text: String,
        font_size: f64,
        font_family: String,
        font_weight: String,
        font_style: String,
        text_align: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(flatten)]
        common: ObjectCommon,
        width: f64,
        height: f64,
        scale_x: f64,
        scale_y: f64,
        src: String,
        cross_origin: String,
    },
    #[serde(rename_all = "camelCase")]
    Path {
        #[serde(flatten)]
        common: ObjectCommon,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
        path: String,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        #[serde(flatten)]
        common: ObjectCommon,
        width: f64,
        height: f64,
        objects: Vec<CanvasObject>,
    },
}

/// The full canvas document handed to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasDocument {
    pub version: String,
    pub objects: Vec<CanvasObject>,
    pub background: String,
}
