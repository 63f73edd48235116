use thiserror::Error;

/// Caller-input failures raised by the billing calculations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid billing cycle `{value}`{}", suggestion_suffix(.suggestion))]
    InvalidCycle {
        value: String,
        suggestion: Option<String>,
    },
    #[error("Custom billing cycle requires a positive day count (got {})", describe_days(.0))]
    InvalidCustomInterval(Option<u32>),
}

impl BillingError {
    pub fn invalid_date(detail: impl Into<String>) -> Self {
        BillingError::InvalidDate(detail.into())
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{name}`?)"),
        None => String::new(),
    }
}

fn describe_days(days: &Option<u32>) -> String {
    match days {
        Some(value) => value.to_string(),
        None => "none".into(),
    }
}

/// Error type that captures record file failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
