use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid extraction options: {0}")]
    InvalidOptions(String),

    #[error("Page {page} has a fragment with a non-finite bounding box: {text:?}")]
    NonFiniteFragment { page: usize, text: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
