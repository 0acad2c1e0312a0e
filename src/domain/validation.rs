//! Field validation for auth and note payloads.
//!
//! Each function checks one field and returns the first violated constraint
//! as a [`DomainError::Validation`]. Callers check fields in a fixed order
//! (email, password; title, content, category) so the reported error is
//! deterministic. Lengths count Unicode scalar values.

use crate::domain::error::DomainError;

pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const TITLE_MAX_LEN: usize = 200;
pub const CONTENT_MAX_LEN: usize = 10_000;
pub const CATEGORY_MAX_LEN: usize = 50;

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::validation("Email is required"));
    }
    if email.chars().count() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("Email is invalid"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| DomainError::validation("Email is invalid"))?;

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok {
        return Err(DomainError::validation("Email is invalid"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

/// Login only requires a non-empty password; the length rule applies at registration.
pub fn validate_login_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::validation("Password is required"));
    }
    Ok(())
}

/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Title is required"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(format!(
            "Title must not exceed {} characters",
            TITLE_MAX_LEN
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(DomainError::validation(format!(
            "Content must not exceed {} characters",
            CONTENT_MAX_LEN
        )));
    }
    Ok(())
}

/// Empty categories normalise to `None`.
pub fn validate_category(category: Option<&str>) -> Result<Option<String>, DomainError> {
    match category {
        None | Some("") => Ok(None),
        Some(value) if value.chars().count() > CATEGORY_MAX_LEN => {
            Err(DomainError::validation(format!(
                "Category must not exceed {} characters",
                CATEGORY_MAX_LEN
            )))
        }
        Some(value) => Ok(Some(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_common_addresses() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@example",
            "user@@example.com",
            "user@.example.com",
            "user@example.com.",
            "user@exa..mple.com",
            "us er@example.com",
        ] {
            assert!(
                matches!(validate_email(email), Err(DomainError::Validation(_))),
                "expected {email:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_validate_password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_validate_password_counts_characters_not_bytes() {
        // six Cyrillic letters are twelve bytes
        assert!(validate_password("пароль").is_ok());
        assert!(validate_password("парол").is_err());
    }

    #[test]
    fn test_validate_login_password_requires_value() {
        assert!(validate_login_password("").is_err());
        assert!(validate_login_password("x").is_ok());
    }

    #[test]
    fn test_validate_title_trims() {
        assert_eq!(validate_title("  Groceries  ").unwrap(), "Groceries");
    }

    #[test]
    fn test_validate_title_rejects_blank() {
        assert_eq!(
            validate_title("   "),
            Err(DomainError::Validation("Title is required".to_string()))
        );
        assert!(validate_title("").is_err());
    }

    #[test]
    fn test_validate_title_length_boundary() {
        assert!(validate_title(&"a".repeat(200)).is_ok());
        assert!(validate_title(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_content_length_boundary() {
        assert!(validate_content("").is_ok());
        assert!(validate_content(&"a".repeat(10_000)).is_ok());
        assert!(validate_content(&"a".repeat(10_001)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(validate_category(None).unwrap(), None);
        assert_eq!(validate_category(Some("")).unwrap(), None);
        assert_eq!(
            validate_category(Some("Work")).unwrap(),
            Some("Work".to_string())
        );
        assert!(validate_category(Some(&"c".repeat(50))).is_ok());
        assert!(validate_category(Some(&"c".repeat(51))).is_err());
    }
}
