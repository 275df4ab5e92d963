use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid login address '{address}': {reason}")]
    InvalidLoginAddress {
        address: String,
        reason: &'static str,
    },

    #[error("sequence positions start at 1, got {0}")]
    InvalidSequencePosition(u32),
}

pub type Result<T> = std::result::Result<T, CoreError>;
