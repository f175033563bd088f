use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub email: String, // primary key, stored lower-cased
    pub name: String,
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 PHC string, never serialized
    pub registration_timestamp: OffsetDateTime,
    pub roles: Vec<String>, // never empty
}

/// A user row without the password column, as returned by listings.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub registration_timestamp: OffsetDateTime,
    pub roles: Vec<String>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            email: u.email,
            name: u.name,
            registration_timestamp: u.registration_timestamp,
            roles: u.roles,
        }
    }
}
