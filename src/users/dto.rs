use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::users::repo_types::UserProfile;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

// e.g. 2023-01-01T14:01:09.000+02:00
time::serde::format_description!(
    zoned_millis,
    OffsetDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
);

/// Request body for user creation. Any client-supplied
/// `registrationTimestamp` is dropped by serde.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Partial update. Absent or null fields are left alone; `email` and
/// `registrationTimestamp` are not updatable and are dropped by serde.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// `?password=` on the per-user routes.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub criteria: Option<String>,
    pub value: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}
fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// User as returned to clients, rendered in the reference zone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub email: String,
    pub name: String,
    #[serde(with = "zoned_millis")]
    pub registration_timestamp: OffsetDateTime,
    pub roles: Vec<String>,
}

impl PublicUser {
    pub fn new(profile: UserProfile, offset: UtcOffset) -> Self {
        Self {
            email: profile.email,
            name: profile.name,
            registration_timestamp: profile.registration_timestamp.to_offset(offset),
            roles: profile.roles,
        }
    }
}
