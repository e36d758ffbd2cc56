use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("unsupported log item kind")]
    UnsupportedItemKind,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("command bus error: {0}")]
    BusError(String),
}
