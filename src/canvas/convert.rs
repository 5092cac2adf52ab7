//! Neutral tree → fabric canvas document.
//!
//! Pure and synchronous: no shared state, safe to call repeatedly or from
//! any thread. Dispatch precedence per node:
//!
//! 1. an IMAGE fill or a whole-node export wins and emits an `image`
//!    object; if no payload actually resolved, the node takes the rect
//!    fallback instead of emitting a broken reference;
//! 2. otherwise the declared type decides;
//! 3. an unrecognized type with positive extent becomes a rect;
//! 4. anything else contributes no object.
//!
//! Coordinates are rebased against the immediate parent group only: each
//! group passes its own (x, y) as the offset for its direct children, and
//! root nodes use (0, 0).

use crate::color;
use crate::extract::neutral::{FillDescriptor, NeutralNode};
use crate::scene::NodeType;

use super::objects::{CanvasDocument, CanvasObject, ObjectCommon, BACKGROUND, FABRIC_VERSION};

/// Offset subtracted from a node's document coordinates
#[derive(Debug, Clone, Copy)]
struct Offset {
    x: f64,
    y: f64,
}

impl Offset {
    const ZERO: Offset = Offset { x: 0.0, y: 0.0 };
}

/// Convert ordered neutral trees into a fabric canvas document
pub fn convert(roots: &[NeutralNode]) -> CanvasDocument {
    let objects = roots
        .iter()
        .filter_map(|node| convert_node(node, Offset::ZERO))
        .collect();
    CanvasDocument {
        version: FABRIC_VERSION.to_string(),
        objects,
        background: BACKGROUND.to_string(),
    }
}

fn convert_node(node: &NeutralNode, offset: Offset) -> Option<CanvasObject> {
    // Image payloads take precedence over the declared type
    if node.has_image_fill() || node.exported_image.is_some() {
        return Some(convert_image(node, offset));
    }

    match node.node_type {
        NodeType::Rectangle => Some(convert_rect(node, offset)),
        NodeType::Ellipse => Some(convert_ellipse(node, offset)),
        NodeType::Text => Some(convert_text(node, offset)),
        NodeType::Vector
        | NodeType::Line
        | NodeType::Polygon
        | NodeType::Star
        | NodeType::BooleanOperation => Some(convert_path(node, offset)),
        NodeType::Frame | NodeType::Group | NodeType::Component | NodeType::Instance => {
            Some(convert_group(node, offset))
        }
        NodeType::Unknown => {
            if node.width > 0.0 && node.height > 0.0 {
                Some(convert_rect(node, offset))
            } else {
                None
            }
        }
    }
}

fn common(node: &NeutralNode, offset: Offset) -> ObjectCommon {
    ObjectCommon {
        version: FABRIC_VERSION.to_string(),
        origin_x: "left".to_string(),
        origin_y: "top".to_string(),
        left: node.x - offset.x,
        top: node.y - offset.y,
        angle: node.rotation,
        opacity: node.opacity,
        visible: node.visible,
        name: node.name.clone(),
        id: node.id.clone(),
    }
}

/// First SOLID fill resolved against its opacity, `"transparent"` otherwise
fn primary_fill(node: &NeutralNode) -> String {
    node.fills
        .as_deref()
        .and_then(|fills| {
            fills.iter().find_map(|f| match f {
                FillDescriptor::Solid { hex, opacity, .. } => {
                    Some(color::resolve_for_opacity(hex, *opacity))
                }
                _ => None,
            })
        })
        .unwrap_or_else(|| "transparent".to_string())
}

/// First stroke that carries a color, resolved against its opacity
fn primary_stroke(node: &NeutralNode) -> Option<String> {
    node.strokes.as_deref().and_then(|strokes| {
        strokes.iter().find_map(|s| {
            s.color
                .as_ref()
                .map(|hex| color::resolve_for_opacity(hex, s.opacity))
        })
    })
}

fn stroke_width(node: &NeutralNode) -> f64 {
    node.stroke_weight.unwrap_or(0.0)
}

fn convert_rect(node: &NeutralNode, offset: Offset) -> CanvasObject {
    let radius = node.corner_radius.or(node.top_left_radius).unwrap_or(0.0);
    CanvasObject::Rect {
        common: common(node, offset),
        width: node.width,
        height: node.height,
        fill: primary_fill(node),
        stroke: primary_stroke(node),
        stroke_width: stroke_width(node),
        rx: radius,
        ry: radius,
    }
}

fn convert_ellipse(node: &NeutralNode, offset: Offset) -> CanvasObject {
    // Exact equality on purpose: only a true square becomes a circle
    #[allow(clippy::float_cmp)]
    let is_circle = node.width == node.height;

    if is_circle {
        CanvasObject::Circle {
            common: common(node, offset),
            radius: node.width / 2.0,
            fill: primary_fill(node),
            stroke: primary_stroke(node),
            stroke_width: stroke_width(node),
        }
    } else {
        CanvasObject::Ellipse {
            common: common(node, offset),
            rx: node.width / 2.0,
            ry: node.height / 2.0,
            fill: primary_fill(node),
            stroke: primary_stroke(node),
            stroke_width: stroke_width(node),
        }
    }
}

fn convert_text(node: &NeutralNode, offset: Offset) -> CanvasObject {
    let style = node
        .font_name
        .as_ref()
        .map(|f| f.style.as_str())
        .unwrap_or_default();
    CanvasObject::Text {
        common: common(node, offset),
        width: node.width,
        height: node.height,
        fill: primary_fill(node),
        stroke: primary_stroke(node),
        stroke_width: stroke_width(node),
        text: node.characters.clone().unwrap_or_default(),
        font_size: node.font_size.unwrap_or(16.0),
        font_family: node
            .font_name
            .as_ref()
            .map(|f| f.family.clone())
            .unwrap_or_else(|| "Arial".to_string()),
        font_weight: if style.contains("Bold") { "bold" } else { "normal" }.to_string(),
        font_style: if style.contains("Italic") { "italic" } else { "normal" }.to_string(),
        text_align: map_text_align(node.text_align_horizontal.as_deref()).to_string(),
    }
}

/// Horizontal alignment table; anything unrecognized or absent is "left"
fn map_text_align(align: Option<&str>) -> &'static str {
    match align {
        Some("CENTER") => "center",
        Some("RIGHT") => "right",
        Some("JUSTIFIED") => "justify",
        _ => "left",
    }
}

fn convert_image(node: &NeutralNode, offset: Offset) -> CanvasObject {
    let Some(src) = node.image_payload() else {
        // Rasterization failed upstream: no broken reference, plain rect
        return convert_rect(node, offset);
    };
    CanvasObject::Image {
        common: common(node, offset),
        width: node.width,
        height: node.height,
        scale_x: 1.0,
        scale_y: 1.0,
        src: src.to_string(),
        cross_origin: "anonymous".to_string(),
    }
}

fn convert_path(node: &NeutralNode, offset: Offset) -> CanvasObject {
    let path = node
        .vector_paths
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|paths| {
            paths
                .iter()
                .filter_map(|p| p.get("data").and_then(|d| d.as_str()))
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .unwrap_or_default();

    if path.is_empty() {
        return convert_rect(node, offset);
    }

    CanvasObject::Path {
        common: common(node, offset),
        width: node.width,
        height: node.height,
        fill: primary_fill(node),
        stroke: primary_stroke(node),
        stroke_width: stroke_width(node),
        path,
    }
}

fn convert_group(node: &NeutralNode, offset: Offset) -> CanvasObject {
    // Direct children are rebased against this group's own position
    let child_offset = Offset {
        x: node.x,
        y: node.y,
    };
    let mut objects: Vec<CanvasObject> = node
        .children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|child| convert_node(child, child_offset))
        .collect();

    if node.node_type == NodeType::Frame
        && node.fills.as_deref().is_some_and(|fills| !fills.is_empty())
    {
        objects.insert(0, frame_background(node));
    }

    CanvasObject::Group {
        common: common(node, offset),
        width: node.width,
        height: node.height,
        objects,
    }
}

/// Background rect spanning a frame's own local coordinate space
fn frame_background(node: &NeutralNode) -> CanvasObject {
    let radius = node.corner_radius.unwrap_or(0.0);
    CanvasObject::Rect {
        common: ObjectCommon {
            version: FABRIC_VERSION.to_string(),
            origin_x: "left".to_string(),
            origin_y: "top".to_string(),
            left: 0.0,
            top: 0.0,
            angle: 0.0,
            opacity: 1.0,
            visible: true,
            name: format!("{}_bg", node.name),
            id: format!("{}_bg", node.id),
        },
        width: node.width,
        height: node.height,
        fill: primary_fill(node),
        stroke: None,
        stroke_width: 0.0,
        rx: radius,
        ry: radius,
    }
}
