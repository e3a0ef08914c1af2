//! Validation module
//!
//! Function, table and column names are spliced into SQL text, so every name must pass
//! through [`Identifier`] first.

use std::fmt;

/// Validation errors for database identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validated, optionally schema-qualified SQL identifier (`name` or `schema.name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// PostgreSQL identifier length limit
    const MAX_LENGTH: usize = 63;

    const RESERVED_KEYWORDS: &'static [&'static str] = &[
        "ALL", "ALTER", "AND", "AS", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN", "CONSTRAINT",
        "CREATE", "DEFAULT", "DELETE", "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FALSE",
        "FOREIGN", "FROM", "FULL", "FUNCTION", "GRANT", "GROUP", "HAVING", "IN", "INDEX",
        "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
        "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RETURNING",
        "RIGHT", "SELECT", "TABLE", "THEN", "TO", "TRUE", "TRUNCATE", "UNION", "UNIQUE",
        "UPDATE", "USER", "USING", "VIEW", "WHEN", "WHERE", "WITH",
    ];

    /// Create a new validated identifier
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let mut parts = name.splitn(2, '.');
        let first = parts.next().unwrap_or_default();
        Self::validate_part(first)?;
        if let Some(second) = parts.next() {
            Self::validate_part(second)?;
        }
        Ok(Self(name.to_string()))
    }

    /// Get the validated name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_part(name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(ValidationError::TooLong {
                name: name.to_string(),
                length: name.len(),
                max_length: Self::MAX_LENGTH,
            });
        }

        let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return Err(ValidationError::InvalidStartCharacter(name.to_string()));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidCharacters(name.to_string()));
        }

        if Self::RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str()) {
            return Err(ValidationError::ReservedKeyword(name.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_validation() {
        assert!(Identifier::new("get_hit_streaks").is_ok());
        assert!(Identifier::new("prop_alternates").is_ok());
        assert!(Identifier::new("public.get_hit_streaks").is_ok());
        assert!(Identifier::new("_private").is_ok());

        assert!(Identifier::new("SELECT").is_err());
        assert!(Identifier::new("123table").is_err());
        assert!(Identifier::new("get-hit-streaks").is_err());
        assert!(Identifier::new("").is_err());
    }

    #[test]
    fn test_injection_attempts_are_rejected() {
        assert!(matches!(
            Identifier::new("f(); drop table x"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(Identifier::new("public.").is_err());
        assert!(Identifier::new("a.b.c").is_err());
    }

    #[test]
    fn test_too_long() {
        let name = "a".repeat(64);
        assert!(matches!(
            Identifier::new(&name),
            Err(ValidationError::TooLong { length: 64, .. })
        ));
    }
}
