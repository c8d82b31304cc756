use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowroomError {
    #[error("Invalid argument: {field} — {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Capacity exceeded: {list} holds at most {limit} entries")]
    CapacityExceeded { list: String, limit: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ShowroomError {
    fn from(e: serde_json::Error) -> Self {
        ShowroomError::SerializationError(e.to_string())
    }
}
