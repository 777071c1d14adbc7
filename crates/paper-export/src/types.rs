use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No segments to export")]
    NoSegments,
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
