/// A request value that failed validation.
///
/// Always caller-fixable: the message names the offending field and the
/// reason, never an internal filesystem path.
#[derive(Debug, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// The request field that failed validation.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for the given field.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
