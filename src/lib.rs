//! # scene2fabric
//!
//! A library for exporting a selection from a design document's scene graph
//! into two serialized forms: a neutral, type-tagged JSON mirror of the
//! document semantics, and a fabric.js-compatible canvas JSON document.
//!
//! The pipeline has two stages:
//!
//! 1. [`extract::NodeExtractor`] walks the selected subtrees asynchronously
//!    (image rasterization is an async host capability) and produces ordered
//!    [`extract::NeutralNode`] trees;
//! 2. [`canvas::convert`] walks a neutral tree synchronously and emits
//!    per-shape-type records with coordinates rebased to the nearest
//!    enclosing group.
//!
//! The host scene graph is injected through [`host::SceneHost`], so the
//! pipeline runs against an in-memory or file-backed host just as well as
//! against a live document.
//!
//! ## Example
//!
//! ```no_run
//! use scene2fabric::canvas;
//! use scene2fabric::extract::{ExtractOptions, NoProgress, NodeExtractor};
//! use scene2fabric::host::StaticHost;
//!
//! # async fn run() -> scene2fabric::Result<()> {
//! let host = StaticHost::new(vec![/* selected root nodes */]);
//! let extractor = NodeExtractor::new(&host);
//!
//! let roots = extractor
//!     .collect_selection(&ExtractOptions::default(), &mut NoProgress)
//!     .await?;
//! let document = canvas::convert(&roots);
//!
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod color;
pub mod error;
pub mod extract;
pub mod host;
pub mod image;
pub mod messaging;
pub mod scene;

// Re-export commonly used items
pub use canvas::{CanvasDocument, CanvasObject};
pub use error::{ExportError, Result};
pub use extract::{ExtractOptions, NeutralNode, NodeExtractor};
pub use host::SceneHost;
