use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LtxError {
    #[error("invalid postal code '{0}'")]
    InvalidPostalCode(String),
}

pub type Result<T> = std::result::Result<T, LtxError>;
