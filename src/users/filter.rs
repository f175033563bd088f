//! Selection of the listing predicate from the `criteria`/`value` query pair.

use std::str::FromStr;

use time::{Duration, OffsetDateTime};

use crate::error::AppError;

use super::repo_types::User;

/// Window covered by `byRegistrationToday`.
pub const REGISTRATION_WINDOW: Duration = Duration::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criteria {
    ByRole,
    ByEmailDomain,
    ByRegistrationToday,
}

impl FromStr for Criteria {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byRole" => Ok(Self::ByRole),
            "byEmailDomain" => Ok(Self::ByEmailDomain),
            "byRegistrationToday" => Ok(Self::ByRegistrationToday),
            other => Err(AppError::InvalidCriteria(other.to_string())),
        }
    }
}

/// Predicate over the user collection, fully resolved against request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Role(String),
    EmailDomain(String),
    RegisteredSince(OffsetDateTime),
}

impl UserFilter {
    /// An empty `value` counts as missing.
    pub fn select(
        criteria: Option<&str>,
        value: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Self, AppError> {
        let Some(raw) = criteria.filter(|c| !c.is_empty()) else {
            return Ok(Self::All);
        };
        let criteria: Criteria = raw.parse()?;
        let value = value.filter(|v| !v.is_empty());

        Ok(match (criteria, value) {
            (Criteria::ByRole, Some(role)) => Self::Role(role.to_string()),
            // stored emails are lower-cased
            (Criteria::ByEmailDomain, Some(domain)) => Self::EmailDomain(domain.to_lowercase()),
            (Criteria::ByRegistrationToday, _) => Self::RegisteredSince(now - REGISTRATION_WINDOW),
            (_, None) => return Err(AppError::MissingValue),
        })
    }

    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Role(role) => user.roles.iter().any(|r| r == role),
            Self::EmailDomain(domain) => user
                .email
                .strip_suffix(domain.as_str())
                .is_some_and(|local| local.ends_with('@')),
            Self::RegisteredSince(since) => user.registration_timestamp >= *since,
        }
    }
}
