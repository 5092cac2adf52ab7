use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Selection is empty: select at least one node to export")]
    EmptySelection,

    #[error("Rasterization failed for node {node_id}: {reason}")]
    Rasterization { node_id: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
