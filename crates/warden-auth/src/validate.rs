//! Email shape and password strength checks.
//!
//! Both checks are pure and cheap; they run before any hashing or storage
//! access.

use std::fmt;

use warden_core::config::AuthConfig;

/// Minimum password length when no configuration is supplied.
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+{}|:\"<>?";

/// Checks that `email` has the shape `local@domain.tld`.
///
/// The local part may contain ASCII letters, digits and `._%+-`; the domain
/// ASCII letters, digits, `.` and `-`; and the final dot-separated label must
/// be at least two ASCII letters. There is no DNS lookup.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }
    if domain.is_empty() || !domain.chars().all(is_domain_char) {
        return false;
    }

    // Backtracking over the domain: any dot with a non-empty prefix and an
    // all-letter suffix of length >= 2 is a valid TLD split.
    domain.char_indices().any(|(i, c)| {
        c == '.' && i > 0 && {
            let tld = &domain[i + 1..];
            tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
    })
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-')
}

/// The first password rule a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRuleViolation {
    /// Fewer characters than the minimum.
    TooShort {
        /// Required minimum length.
        min: usize,
    },
    /// No lowercase letter.
    MissingLowercase,
    /// No uppercase letter.
    MissingUppercase,
    /// No ASCII digit.
    MissingDigit,
    /// None of [`SPECIAL_CHARS`].
    MissingSpecial,
    /// Passed every structural rule but scored below the entropy floor.
    TooWeak {
        /// Score the password received (0-4).
        score: u8,
        /// Required minimum score.
        min: u8,
    },
}

impl fmt::Display for PasswordRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "password must be at least {min} characters long")
            }
            Self::MissingLowercase => {
                write!(f, "password must contain at least one lowercase letter")
            }
            Self::MissingUppercase => {
                write!(f, "password must contain at least one uppercase letter")
            }
            Self::MissingDigit => write!(f, "password must contain at least one digit"),
            Self::MissingSpecial => {
                write!(f, "password must contain at least one special character")
            }
            Self::TooWeak { score, min } => write!(
                f,
                "password is too easy to guess (strength {score} of 4, need {min})"
            ),
        }
    }
}

impl std::error::Error for PasswordRuleViolation {}

/// Checks `password` against the structural rules with the default minimum
/// length.
pub fn validate_password(password: &str) -> Result<(), PasswordRuleViolation> {
    check_structure(password, DEFAULT_MIN_LENGTH)
}

fn check_structure(password: &str, min_length: usize) -> Result<(), PasswordRuleViolation> {
    if password.chars().count() < min_length {
        return Err(PasswordRuleViolation::TooShort { min: min_length });
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(PasswordRuleViolation::MissingLowercase);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PasswordRuleViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRuleViolation::MissingDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(PasswordRuleViolation::MissingSpecial);
    }
    Ok(())
}

/// Configured password rules.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    min_score: Option<u8>,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score,
        }
    }

    /// Checks the structural rules in order, then the optional entropy floor.
    ///
    /// `user_inputs` (names, email) are penalised by the entropy estimator.
    pub fn check(&self, password: &str, user_inputs: &[&str]) -> Result<(), PasswordRuleViolation> {
        check_structure(password, self.min_length)?;

        if let Some(min) = self.min_score {
            let score = zxcvbn::zxcvbn(password, user_inputs).score() as u8;
            if score < min {
                return Err(PasswordRuleViolation::TooWeak { score, min });
            }
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            min_score: None,
        }
    }
}
