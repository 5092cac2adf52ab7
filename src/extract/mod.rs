pub mod extractor;
pub mod neutral;

// Re-export commonly used items
pub use extractor::{ExtractOptions, NoProgress, NodeExtractor, ProgressSink};
pub use neutral::{
    EffectDescriptor, FillDescriptor, GradientStop, NeutralNode, StrokeDescriptor,
};
