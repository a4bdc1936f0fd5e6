//! Validation errors for goal records.

/// Result alias for validation.
pub type ValidationResult<T = ()> = std::result::Result<T, ValidationError>;

/// A goal record failed a field constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Name is empty or whitespace
    #[error("name must not be empty")]
    EmptyName,

    /// Hours goal without a target
    #[error("hours goals need a positive total_hours")]
    MissingTotalHours,

    /// Target hours is negative, zero or not finite
    #[error("invalid total_hours: {0}")]
    InvalidTotalHours(f64),

    /// Completion outside 0-100
    #[error("completion must be between 0 and 100, got {0}")]
    CompletionOutOfRange(f64),

    /// Negative or non-finite hours
    #[error("hours must be a non-negative number, got {0}")]
    NegativeHours(f64),

    /// Unrecognized goal type tag
    #[error("unknown goal type: {0}")]
    UnknownGoalType(String),
}

pub(crate) fn check_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn check_completion(completion: f64) -> ValidationResult {
    if !(0.0..=100.0).contains(&completion) {
        return Err(ValidationError::CompletionOutOfRange(completion));
    }
    Ok(())
}

pub(crate) fn check_hours(hours: f64) -> ValidationResult {
    if !hours.is_finite() || hours < 0.0 {
        return Err(ValidationError::NegativeHours(hours));
    }
    Ok(())
}
