use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// The id does not parse, so no record can ever match it.
    #[error("Invalid TodoId: {0}")]
    InvalidId(String),

    #[error("Todo NOT found: {0}")]
    NotFound(String),

    /// Store call failed. The message is passed through as reported by the store.
    #[error("Store error: {0}")]
    Store(String),
}

impl TodoError {
    /// Machine readable code attached to GraphQL error entries.
    pub fn code(&self) -> &'static str {
        match self {
            TodoError::InvalidId(_) => "INVALID_ID",
            TodoError::NotFound(_) => "NOT_FOUND",
            TodoError::Store(_) => "STORE_FAILURE",
        }
    }
}

pub type TodoResult<T> = Result<T, TodoError>;
