use serde_json::Value;
use thiserror::Error;

/// Shortest accepted recipe instructions, counted in characters.
pub const MIN_INSTRUCTIONS_LEN: usize = 50;

/// A field value rejected on assignment. The message is meant for end users.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must be present.")]
    UsernameMissing,
    #[error("Username must be unique.")]
    UsernameTaken,
    #[error("Title must be present.")]
    TitleMissing,
    #[error("Instructions cannot be empty.")]
    InstructionsMissing,
    #[error("Instructions must be at least 50 characters long.")]
    InstructionsTooShort,
    #[error("Minutes to complete must be a positive integer.")]
    MinutesNotPositive,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameMissing);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::TitleMissing);
    }
    Ok(())
}

pub fn validate_instructions(instructions: &str) -> Result<(), ValidationError> {
    if instructions.is_empty() {
        return Err(ValidationError::InstructionsMissing);
    }
    if instructions.chars().count() < MIN_INSTRUCTIONS_LEN {
        return Err(ValidationError::InstructionsTooShort);
    }
    Ok(())
}

pub fn validate_minutes(minutes: i64) -> Result<(), ValidationError> {
    if minutes < 1 {
        return Err(ValidationError::MinutesNotPositive);
    }
    Ok(())
}

/// Accepts only JSON integers; floats, strings, bools and null are rejected
/// the same way as non-positive numbers.
pub fn minutes_from_json(value: &Value) -> Result<i64, ValidationError> {
    let minutes = match value {
        Value::Number(n) => n.as_i64().ok_or(ValidationError::MinutesNotPositive)?,
        _ => return Err(ValidationError::MinutesNotPositive),
    };
    validate_minutes(minutes)?;
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameMissing));
        assert_eq!(validate_title(""), Err(ValidationError::TitleMissing));
        assert_eq!(
            validate_instructions(""),
            Err(ValidationError::InstructionsMissing)
        );
    }

    #[test]
    fn whitespace_is_not_empty() {
        assert_eq!(validate_username(" "), Ok(()));
        assert_eq!(validate_title("  "), Ok(()));
        assert_eq!(
            validate_instructions(&" ".repeat(4)),
            Err(ValidationError::InstructionsTooShort)
        );
        assert_eq!(validate_instructions(&" ".repeat(MIN_INSTRUCTIONS_LEN + 10)), Ok(()));
    }

    #[test]
    fn instructions_length_boundary() {
        let short = "a".repeat(MIN_INSTRUCTIONS_LEN - 1);
        let exact = "a".repeat(MIN_INSTRUCTIONS_LEN);
        assert_eq!(
            validate_instructions(&short),
            Err(ValidationError::InstructionsTooShort)
        );
        assert_eq!(validate_instructions(&exact), Ok(()));
        assert_eq!(validate_instructions(&"b".repeat(500)), Ok(()));
    }

    #[test]
    fn instructions_length_counts_characters_not_bytes() {
        // 49 two-byte characters: 98 bytes but still too short
        let accented = "é".repeat(MIN_INSTRUCTIONS_LEN - 1);
        assert!(accented.len() >= MIN_INSTRUCTIONS_LEN);
        assert_eq!(
            validate_instructions(&accented),
            Err(ValidationError::InstructionsTooShort)
        );
    }

    #[test]
    fn minutes_must_be_positive() {
        for n in [i64::MIN, -5, -1, 0] {
            assert_eq!(validate_minutes(n), Err(ValidationError::MinutesNotPositive));
        }
        for n in [1, 2, 45, i64::MAX] {
            assert_eq!(validate_minutes(n), Ok(()));
        }
    }

    #[test]
    fn minutes_from_json_rejects_non_integers() {
        for v in [
            json!(12.5),
            json!(30.0),
            json!("30"),
            json!(true),
            json!(null),
            json!([30]),
            json!(u64::MAX),
        ] {
            assert_eq!(
                minutes_from_json(&v),
                Err(ValidationError::MinutesNotPositive),
                "{v} should be rejected"
            );
        }
        assert_eq!(minutes_from_json(&json!(0)), Err(ValidationError::MinutesNotPositive));
        assert_eq!(minutes_from_json(&json!(-3)), Err(ValidationError::MinutesNotPositive));
        assert_eq!(minutes_from_json(&json!(25)), Ok(25));
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ValidationError::InstructionsTooShort.to_string(),
            "Instructions must be at least 50 characters long."
        );
        assert_eq!(
            ValidationError::UsernameTaken.to_string(),
            "Username must be unique."
        );
    }
}
