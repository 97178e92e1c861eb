use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),

    #[error("detector failure: {0}")]
    Detector(String),
}
