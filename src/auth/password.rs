use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use thiserror::Error;
use tracing::error;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 3;

/// First strength rule a password fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeakPassword {
    #[error("Password must be at least 3 characters long")]
    TooShort,
    #[error("Password must contain at least one digit")]
    MissingDigit,
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
}

lazy_static! {
    static ref DIGIT_RE: Regex = Regex::new(r"\d").expect("digit regex");
    static ref LOWER_RE: Regex = Regex::new(r"[a-z]").expect("lowercase regex");
    static ref UPPER_RE: Regex = Regex::new(r"[A-Z]").expect("uppercase regex");
}

/// Checks the rules in order and reports the first one that fails.
pub fn validate(password: &str) -> Result<&str, WeakPassword> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(WeakPassword::TooShort);
    }
    if !DIGIT_RE.is_match(password) {
        return Err(WeakPassword::MissingDigit);
    }
    if !LOWER_RE.is_match(password) {
        return Err(WeakPassword::MissingLowercase);
    }
    if !UPPER_RE.is_match(password) {
        return Err(WeakPassword::MissingUppercase);
    }
    Ok(password)
}

/// Validates, then hashes with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    validate(plain)?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
