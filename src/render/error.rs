use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("draw failed: {0}")]
    Draw(String),
}
