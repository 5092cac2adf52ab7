use futures::future::BoxFuture;

use crate::color;
use crate::error::{ExportError, Result};
use crate::extract::neutral::{
    EffectDescriptor, FillDescriptor, GradientStop, NeutralNode, StrokeDescriptor,
};
use crate::host::{RasterRequest, SceneHost};
use crate::image::ImageExporter;
use crate::scene::{ColorStop, EffectType, NodeType, PaintType, SceneNode};

/// Options recognized by the extractor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// Attach a whole-node rasterization to FRAME / COMPONENT / INSTANCE
    /// nodes
    pub export_images: bool,
    /// Scale for whole-node rasterizations (IMAGE fills always rasterize at
    /// scale 1, independent of this)
    pub image_scale: f64,
    /// When false, children with `visible: false` are pruned entirely from
    /// the output, recursively
    pub include_hidden: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            export_images: false,
            image_scale: 1.0,
            include_hidden: false,
        }
    }
}

/// Receives one notification per completed selection root
///
/// Injected rather than ambient so traversal order stays observable in
/// tests and the UI boundary stays out of the extractor.
pub trait ProgressSink: Send {
    /// `current` is 1-based and strictly increasing up to `total`
    fn root_extracted(&mut self, current: usize, total: usize, name: &str);
}

/// Sink that discards progress, for callers that don't report any
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn root_extracted(&mut self, _current: usize, _total: usize, _name: &str) {}
}

/// Walks selected subtrees and produces neutral trees
///
/// Traversal is strictly sequential: a node's own image export (if any)
/// completes before its children are processed, and a child's whole
/// extraction completes before its next sibling begins. That keeps progress
/// reporting deterministic and bounds in-flight rasterizations against the
/// host renderer to one at a time.
pub struct NodeExtractor<'a> {
    host: &'a dyn SceneHost,
    images: ImageExporter<'a>,
}

impl<'a> NodeExtractor<'a> {
    pub fn new(host: &'a dyn SceneHost) -> Self {
        Self {
            host,
            images: ImageExporter::new(host),
        }
    }

    /// Extract every root in the current selection, in declared order
    ///
    /// Fails with [`ExportError::EmptySelection`] when nothing is selected;
    /// no progress is reported in that case. Otherwise `progress` is
    /// notified exactly once per completed root.
    pub async fn collect_selection(
        &self,
        options: &ExtractOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<NeutralNode>> {
        let selection = self.host.selection();
        if selection.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let total = selection.len();
        let mut roots = Vec::with_capacity(total);
        for (index, node) in selection.iter().enumerate() {
            let extracted = self.extract(node, options).await;
            progress.root_extracted(index + 1, total, &node.name);
            roots.push(extracted);
        }
        Ok(roots)
    }

    /// Recursively extract one node and its surviving children
    pub fn extract<'b>(
        &'b self,
        node: &'b SceneNode,
        options: &'b ExtractOptions,
    ) -> BoxFuture<'b, NeutralNode> {
        Box::pin(async move {
            let fills = self.extract_fills(node).await;
            let fill = fills.as_deref().and_then(first_solid_hex);

            let exported_image = if options.export_images
                && matches!(
                    node.node_type,
                    NodeType::Frame | NodeType::Component | NodeType::Instance
                ) {
                self.images
                    .export_as_image(node, &RasterRequest::png_at_scale(options.image_scale))
                    .await
            } else {
                None
            };

            let strokes = extract_strokes(node);
            let (stroke_weight, stroke_align) = if strokes.is_some() {
                (node.stroke_weight, node.stroke_align.clone())
            } else {
                (None, None)
            };

            let is_text = node.node_type == NodeType::Text;
            let carries_paths = matches!(
                node.node_type,
                NodeType::Vector | NodeType::BooleanOperation
            );

            // Children last: the node's own exports are complete by now, so
            // the renderer never sees two requests in flight.
            let children = match &node.children {
                Some(source) => {
                    let mut out = Vec::with_capacity(source.len());
                    for child in source {
                        if !options.include_hidden && !child.is_visible() {
                            continue;
                        }
                        out.push(self.extract(child, options).await);
                    }
                    Some(out)
                }
                None => None,
            };

            NeutralNode {
                id: node.id.clone(),
                name: node.name.clone(),
                node_type: node.node_type,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                rotation: node.rotation.unwrap_or(0.0),
                opacity: node.opacity.unwrap_or(1.0),
                visible: node.is_visible(),
                fill,
                fills,
                strokes,
                stroke_weight,
                stroke_align,
                corner_radius: node.corner_radius,
                top_left_radius: node.top_left_radius,
                top_right_radius: node.top_right_radius,
                bottom_left_radius: node.bottom_left_radius,
                bottom_right_radius: node.bottom_right_radius,
                characters: if is_text { node.characters.clone() } else { None },
                font_size: if is_text { node.font_size } else { None },
                font_name: if is_text { node.font_name.clone() } else { None },
                text_align_horizontal: if is_text {
                    node.text_align_horizontal.clone()
                } else {
                    None
                },
                text_align_vertical: if is_text {
                    node.text_align_vertical.clone()
                } else {
                    None
                },
                letter_spacing: if is_text { node.letter_spacing.clone() } else { None },
                line_height: if is_text { node.line_height.clone() } else { None },
                text_case: if is_text { node.text_case.clone() } else { None },
                text_decoration: if is_text { node.text_decoration.clone() } else { None },
                vector_paths: if carries_paths {
                    node.vector_paths.clone()
                } else {
                    None
                },
                vector_network: if carries_paths {
                    node.vector_network.clone()
                } else {
                    None
                },
                effects: extract_effects(node),
                blend_mode: node.blend_mode.clone(),
                constraints: node.constraints.clone(),
                exported_image,
                children,
            }
        })
    }

    /// Map visible source fills to descriptors, in source order
    ///
    /// An IMAGE fill triggers a whole-node rasterization at fixed scale 1;
    /// when that fails the descriptor keeps its slot with an absent payload.
    async fn extract_fills(&self, node: &SceneNode) -> Option<Vec<FillDescriptor>> {
        let source = node.fills.as_deref()?;
        let mut out = Vec::new();
        for paint in source.iter().filter(|p| p.is_visible()) {
            match paint.paint_type {
                PaintType::Solid => {
                    if let Some(c) = &paint.color {
                        out.push(FillDescriptor::Solid {
                            hex: color::to_hex(Some(c)).unwrap_or_default(),
                            rgba: color::to_rgba_string(c),
                            opacity: paint.opacity.unwrap_or(1.0),
                        });
                    }
                }
                PaintType::Image => {
                    let image = self
                        .images
                        .export_as_image(node, &RasterRequest::default())
                        .await;
                    out.push(FillDescriptor::Image {
                        image,
                        scale_mode: paint.scale_mode.clone(),
                    });
                }
                PaintType::GradientLinear => {
                    out.push(FillDescriptor::GradientLinear {
                        stops: gradient_stops(paint.gradient_stops.as_deref()),
                        transform: paint.gradient_transform.clone(),
                    });
                }
                PaintType::GradientRadial => {
                    out.push(FillDescriptor::GradientRadial {
                        stops: gradient_stops(paint.gradient_stops.as_deref()),
                        transform: paint.gradient_transform.clone(),
                    });
                }
                PaintType::Other => {}
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

/// First visible SOLID fill's hex, exposed as the top-level convenience
/// field
fn first_solid_hex(fills: &[FillDescriptor]) -> Option<String> {
    fills.iter().find_map(|f| match f {
        FillDescriptor::Solid { hex, .. } => Some(hex.clone()),
        _ => None,
    })
}

/// Map visible source strokes; only SOLID strokes keep a color
fn extract_strokes(node: &SceneNode) -> Option<Vec<StrokeDescriptor>> {
    let source = node.strokes.as_deref()?;
    let out: Vec<StrokeDescriptor> = source
        .iter()
        .filter(|p| p.is_visible())
        .map(|p| StrokeDescriptor {
            paint_type: p.paint_type,
            color: if p.paint_type == PaintType::Solid {
                color::to_hex(p.color.as_ref())
            } else {
                None
            },
            opacity: p.opacity.unwrap_or(1.0),
        })
        .collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Map visible shadow/blur effects, resolving colors to rgba strings
fn extract_effects(node: &SceneNode) -> Option<Vec<EffectDescriptor>> {
    let source = node.effects.as_deref()?;
    let out: Vec<EffectDescriptor> = source
        .iter()
        .filter(|e| e.is_visible() && e.effect_type != EffectType::Other)
        .map(|e| EffectDescriptor {
            effect_type: e.effect_type,
            color: e.color.as_ref().map(color::to_rgba_string),
            offset: e.offset,
            radius: e.radius,
            spread: e.spread,
        })
        .collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Ordered gradient stops with both string encodings
fn gradient_stops(stops: Option<&[ColorStop]>) -> Vec<GradientStop> {
    stops
        .unwrap_or_default()
        .iter()
        .map(|s| GradientStop {
            position: s.position,
            hex: color::to_hex(Some(&s.color)).unwrap_or_default(),
            rgba: color::to_rgba_string(&s.color),
        })
        .collect()
}
