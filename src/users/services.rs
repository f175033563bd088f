use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    auth::{
        password,
        services::normalize_email,
    },
    error::AppError,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest},
        repo_types::User,
    },
};

/// Current time in `offset`, truncated to the microsecond precision Postgres keeps.
pub fn now_in(offset: UtcOffset) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc().to_offset(offset);
    now - Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

/// Collapses duplicates (first occurrence wins) and rejects an empty set.
/// Role strings are kept verbatim.
pub fn normalize_roles(roles: Vec<String>) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
        if !out.contains(&role) {
            out.push(role);
        }
    }
    if out.is_empty() {
        return Err(AppError::EmptyRoles);
    }
    Ok(out)
}

/// Builds the row for a create request. The registration time is always `now`.
pub fn new_user(req: CreateUserRequest, now: OffsetDateTime) -> Result<User, AppError> {
    let email = normalize_email(&req.email);
    let password_hash = password::hash_password(&req.password)?;
    let roles = normalize_roles(req.roles)?;

    Ok(User {
        email,
        name: req.name,
        password_hash,
        registration_timestamp: now,
        roles,
    })
}

/// Applies the present fields of `req` to `user`.
///
/// Everything is validated before the first assignment, so on error `user`
/// is unchanged.
pub fn merge_update(user: &mut User, req: UpdateUserRequest) -> Result<(), AppError> {
    let password_hash = req
        .password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;
    let roles = req.roles.map(normalize_roles).transpose()?;

    if let Some(name) = req.name {
        user.name = name;
    }
    if let Some(hash) = password_hash {
        user.password_hash = hash;
    }
    if let Some(roles) = roles {
        user.roles = roles;
    }
    Ok(())
}
