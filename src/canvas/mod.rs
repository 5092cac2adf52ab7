pub mod convert;
pub mod objects;

// Re-export commonly used items
pub use convert::convert;
pub use objects::{CanvasDocument, CanvasObject, ObjectCommon, BACKGROUND, FABRIC_VERSION};
