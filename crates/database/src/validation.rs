//! Input validation for user identifiers and profile fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Numeric value outside the accepted range.
    OutOfRange { field: String, min: f64, max: f64, actual: f64 },
    /// Too many entries in a list field.
    TooMany { field: String, max: usize, actual: usize },
    /// Unknown focus area tag.
    UnknownFocus(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::OutOfRange { field, min, max, actual } => {
                write!(f, "{} must be between {} and {} (got {})", field, min, max, actual)
            }
            ValidationError::TooMany { field, max, actual } => {
                write!(f, "{} has too many entries ({}, max {})", field, actual, max)
            }
            ValidationError::UnknownFocus(value) => write!(f, "Unknown focus '{}'", value),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for user identifiers.
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Maximum allowed length for short text fields (gender, tags, priority).
pub const MAX_SHORT_TEXT_LENGTH: usize = 64;

/// Maximum allowed length for free-text goals.
pub const MAX_GOALS_LENGTH: usize = 2000;

/// Maximum number of preference tags.
pub const MAX_PREFERENCE_TAGS: usize = 20;

/// Accepted age range, in years.
pub const AGE_RANGE: (i64, i64) = (1, 130);

/// Upper bound for weight, in kilograms.
pub const MAX_WEIGHT: f64 = 500.0;

/// Validate a user identifier. Leading and trailing whitespace is ignored.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let user_id = user_id.trim();

    if user_id.is_empty() {
        return Err(ValidationError::Empty("user id".to_string()));
    }

    if user_id.len() > MAX_USER_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "user id".to_string(),
            max: MAX_USER_ID_LENGTH,
            actual: user_id.len(),
        });
    }

    Ok(())
}

/// Validate an optional text field against a maximum length.
pub fn validate_text(field: &str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };

    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual: len,
        });
    }

    Ok(())
}

/// Validate an age in years.
pub fn validate_age(age: Option<i64>) -> Result<(), ValidationError> {
    let (min, max) = AGE_RANGE;
    match age {
        Some(age) if age < min || age > max => Err(ValidationError::OutOfRange {
            field: "age".to_string(),
            min: min as f64,
            max: max as f64,
            actual: age as f64,
        }),
        _ => Ok(()),
    }
}

/// Validate a weight in kilograms (must be positive).
pub fn validate_weight(weight: Option<f64>) -> Result<(), ValidationError> {
    match weight {
        Some(weight) if !weight.is_finite() || weight <= 0.0 || weight > MAX_WEIGHT => {
            Err(ValidationError::OutOfRange {
                field: "weight".to_string(),
                min: 0.0,
                max: MAX_WEIGHT,
                actual: weight,
            })
        }
        _ => Ok(()),
    }
}

/// Validate the preference tag list.
pub fn validate_tags(tags: Option<&[String]>) -> Result<(), ValidationError> {
    let Some(tags) = tags else {
        return Ok(());
    };

    if tags.len() > MAX_PREFERENCE_TAGS {
        return Err(ValidationError::TooMany {
            field: "preferences".to_string(),
            max: MAX_PREFERENCE_TAGS,
            actual: tags.len(),
        });
    }

    for tag in tags {
        if tag.trim().is_empty() {
            return Err(ValidationError::Empty("preference tag".to_string()));
        }
        validate_text("preference tag", Some(tag), MAX_SHORT_TEXT_LENGTH)?;
    }

    Ok(())
}
