use thiserror::Error;

/// Errors raised while building a field spec or reducing rows with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// Row `row` (zero-based input position) lacks `column`.
    #[error("Malformed row {row}: missing column '{column}'")]
    MalformedRow { row: usize, column: String },

    #[error("Invalid field spec: {0}")]
    InvalidSpec(String),
}

impl AggregateError {
    pub fn malformed(row: usize, column: &str) -> Self {
        AggregateError::MalformedRow {
            row,
            column: column.to_string(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AggregateError::InvalidSpec(msg.into())
    }
}
