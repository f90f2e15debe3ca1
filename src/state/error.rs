//! Input validation error types.

/// Errors raised when the task input cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Buffer is empty or whitespace only
    #[error("Task content cannot be empty")]
    EmptyContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let error = InputError::EmptyContent;
        assert!(error.to_string().contains("cannot be empty"));
    }
}
