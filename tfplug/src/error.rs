//! Errors raised by the framework itself, as opposed to the diagnostics a
//! provider reports back to the host engine

#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("unknown resource type: {0}")]
    UnknownResource(String),

    #[error("unknown data source type: {0}")]
    UnknownDataSource(String),
}

pub type Result<T> = std::result::Result<T, TfplugError>;
