use thiserror::Error;

/// Errors from parsing, evaluating or rendering a chart
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("Chart spec must be a JSON object")]
    NotAnObject,

    #[error("Unknown chart field: {0}")]
    UnknownField(String),

    #[error("Missing chart field: {0}")]
    MissingField(&'static str),

    #[error("Chart field {field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),
}
