//! Read-only mirror of the host document's scene graph.
//!
//! The host owns these nodes; this crate only reads them. Snapshots are
//! deserialized from the host's JSON representation (camelCase fields,
//! SCREAMING_SNAKE_CASE type tags). Fields a node variant does not carry are
//! simply absent, so everything beyond the shared geometry is optional.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Normalized-channel color, each channel in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

/// Node type tag as declared by the host document
///
/// `Unknown` absorbs any tag outside the documented set so that snapshots
/// from newer hosts still deserialize; dispatch falls through to the
/// explicit fallback arms instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Rectangle,
    Ellipse,
    Text,
    Vector,
    Line,
    Polygon,
    Star,
    BooleanOperation,
    Frame,
    Group,
    Component,
    Instance,
    #[serde(other)]
    Unknown,
}

/// Paint type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    Image,
    GradientLinear,
    GradientRadial,
    #[serde(other)]
    Other,
}

/// A fill or stroke paint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub scale_mode: Option<String>,
    pub gradient_stops: Option<Vec<ColorStop>>,
    pub gradient_transform: Option<JsonValue>,
}

impl Paint {
    /// Paints without a `visible` property are visible
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// One gradient stop: position along the gradient axis plus its color
#[derive(Debug, Clone, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// Effect type tag; shadow and blur families are the recognized set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Other,
}

/// A visual effect attached to a node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    pub color: Option<Color>,
    pub offset: Option<Vector2>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
    pub visible: Option<bool>,
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// 2D offset used by shadow effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// Font family + style pair as stored by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

/// A node of the host scene graph
///
/// Shared geometry is always present (the host defaults missing coordinates
/// to 0); everything else depends on the node variant. `letter_spacing`,
/// `line_height`, `vector_paths`, `vector_network` and `constraints` are
/// host-defined structures carried verbatim, never interpreted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,

    pub fills: Option<Vec<Paint>>,
    pub strokes: Option<Vec<Paint>>,
    pub stroke_weight: Option<f64>,
    pub stroke_align: Option<String>,

    pub corner_radius: Option<f64>,
    pub top_left_radius: Option<f64>,
    pub top_right_radius: Option<f64>,
    pub bottom_left_radius: Option<f64>,
    pub bottom_right_radius: Option<f64>,

    pub characters: Option<String>,
    pub font_size: Option<f64>,
    pub font_name: Option<FontName>,
    pub text_align_horizontal: Option<String>,
    pub text_align_vertical: Option<String>,
    pub letter_spacing: Option<JsonValue>,
    pub line_height: Option<JsonValue>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,

    pub vector_paths: Option<JsonValue>,
    pub vector_network: Option<JsonValue>,

    pub effects: Option<Vec<Effect>>,
    pub blend_mode: Option<String>,
    pub constraints: Option<JsonValue>,

    pub children: Option<Vec<SceneNode>>,
}

impl SceneNode {
    /// Nodes without a `visible` property are visible
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_node() {
        let node: SceneNode = serde_json::from_value(json!({
            "id": "1:2",
            "name": "Rect",
            "type": "RECTANGLE",
            "x": 10.0,
            "y": 20.0,
            "width": 100.0,
            "height": 50.0
        }))
        .unwrap();

        assert_eq!(node.node_type, NodeType::Rectangle);
        assert_eq!(node.x, 10.0);
        assert!(node.fills.is_none());
        assert!(node.is_visible());
    }

    #[test]
    fn test_deserialize_unknown_type() {
        let node: SceneNode = serde_json::from_value(json!({
            "id": "1:3",
            "name": "Widget",
            "type": "STICKY",
            "width": 10.0,
            "height": 10.0
        }))
        .unwrap();

        assert_eq!(node.node_type, NodeType::Unknown);
    }

    #[test]
    fn test_deserialize_paint_tags() {
        let paint: Paint = serde_json::from_value(json!({
            "type": "GRADIENT_LINEAR",
            "gradientStops": [
                { "position": 0.0, "color": { "r": 0.0, "g": 0.0, "b": 0.0 } },
                { "position": 1.0, "color": { "r": 1.0, "g": 1.0, "b": 1.0, "a": 0.5 } }
            ]
        }))
        .unwrap();

        assert_eq!(paint.paint_type, PaintType::GradientLinear);
        assert_eq!(paint.gradient_stops.as_ref().unwrap().len(), 2);
        assert!(paint.is_visible());
    }

    #[test]
    fn test_deserialize_unrecognized_paint_type() {
        let paint: Paint = serde_json::from_value(json!({
            "type": "GRADIENT_ANGULAR"
        }))
        .unwrap();

        assert_eq!(paint.paint_type, PaintType::Other);
    }

    #[test]
    fn test_invisible_flags() {
        let paint: Paint = serde_json::from_value(json!({
            "type": "SOLID",
            "color": { "r": 1.0, "g": 1.0, "b": 1.0 },
            "visible": false
        }))
        .unwrap();
        assert!(!paint.is_visible());

        let effect: Effect = serde_json::from_value(json!({
            "type": "DROP_SHADOW",
            "visible": false
        }))
        .unwrap();
        assert!(!effect.is_visible());
    }

    #[test]
    fn test_node_type_round_trip_tag() {
        let tag = serde_json::to_value(NodeType::BooleanOperation).unwrap();
        assert_eq!(tag, json!("BOOLEAN_OPERATION"));
    }
}
