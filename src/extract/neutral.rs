//! The neutral, type-tagged tree produced by extraction.
//!
//! Independent of any output schema: the raw export serializes these nodes
//! as-is, the canvas converter walks them. A field is present only when the
//! corresponding source data exists and is visible; children keep source
//! order. Nodes are immutable once built.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::scene::{EffectType, FontName, NodeType, PaintType, Vector2};

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A fill, reduced to what downstream consumers need
///
/// The IMAGE variant keeps its slot even when rasterization failed
/// (`image: None`): the converter must still see that an image fill was
/// declared so it can take the documented rect fallback instead of emitting
/// a broken reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FillDescriptor {
    #[serde(rename = "SOLID")]
    Solid {
        hex: String,
        rgba: String,
        #[serde(default = "default_opacity")]
        opacity: f64,
    },
    #[serde(rename = "IMAGE", rename_all = "camelCase")]
    Image {
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        scale_mode: Option<String>,
    },
    #[serde(rename = "GRADIENT_LINEAR")]
    GradientLinear {
        stops: Vec<GradientStop>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transform: Option<JsonValue>,
    },
    #[serde(rename = "GRADIENT_RADIAL")]
    GradientRadial {
        stops: Vec<GradientStop>,
        #[serde(skip_serializing_if = "Option::is_none")]
        transform: Option<JsonValue>,
    },
}

/// One gradient stop with both string encodings of its color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub hex: String,
    pub rgba: String,
}

/// A stroke paint; only SOLID strokes carry a color
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeDescriptor {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

/// A visible shadow or blur effect with its color already resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDescriptor {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

/// Intermediate tree node produced by extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutralNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Convenience copy of the first visible SOLID fill's hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<FillDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<StrokeDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_align: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right_radius: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<FontName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,

    /// Vector path payloads, copied verbatim and never interpreted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_paths: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_network: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<EffectDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<JsonValue>,

    /// Whole-node rasterization, when one was requested and succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NeutralNode>>,
}

impl NeutralNode {
    /// Whether any IMAGE fill was declared, resolved or not
    pub fn has_image_fill(&self) -> bool {
        self.fills
            .as_deref()
            .is_some_and(|fills| fills.iter().any(|f| matches!(f, FillDescriptor::Image { .. })))
    }

    /// The embeddable image payload: the first IMAGE fill's data URI, or
    /// the whole-node export when no fill resolved one
    pub fn image_payload(&self) -> Option<&str> {
        let from_fill = self.fills.as_deref().and_then(|fills| {
            fills.iter().find_map(|f| match f {
                FillDescriptor::Image { image, .. } => image.as_deref(),
                _ => None,
            })
        });
        from_fill.or_else(|| self.exported_image.as_deref())
    }
}
