use time::{macros::datetime, Duration, OffsetDateTime};
use tracing::info;

use crate::{
    auth::password::hash_password,
    error::AppError,
    users::{repo::UserStore, repo_types::User},
};

struct DemoUser {
    email: &'static str,
    name: &'static str,
    password: &'static str,
    registered: Registered,
    roles: &'static [&'static str],
}

enum Registered {
    At(OffsetDateTime),
    Ago(Duration),
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        email: "yarden@example.com",
        name: "Yarden",
        password: "Securepassword1",
        registered: Registered::At(datetime!(2023-01-01 12:01:09 UTC)),
        roles: &["admin", "user"],
    },
    DemoUser {
        email: "another@example.com",
        name: "Another",
        password: "Anotherpassword1",
        registered: Registered::At(datetime!(2024-05-02 13:02:05 UTC)),
        roles: &["user"],
    },
    DemoUser {
        email: "jerbi@example.com",
        name: "Jerbi",
        password: "Jerbipassword1",
        registered: Registered::At(datetime!(2025-08-09 14:07:05 UTC)),
        roles: &["user"],
    },
    // just outside the byRegistrationToday window
    DemoUser {
        email: "late@gmail.com",
        name: "Late by an hour",
        password: "Late1",
        registered: Registered::Ago(Duration::hours(25)),
        roles: &["user"],
    },
];

/// Inserts the demo users that are not there yet. Returns how many were added.
pub async fn seed_demo_users(store: &dyn UserStore, now: OffsetDateTime) -> Result<usize, AppError> {
    let mut inserted = 0;
    for demo in DEMO_USERS {
        if store.find_by_email(demo.email).await?.is_some() {
            continue;
        }
        let registration_timestamp = match demo.registered {
            Registered::At(at) => at.to_offset(now.offset()),
            Registered::Ago(ago) => now - ago,
        };
        let user = User {
            email: demo.email.to_string(),
            name: demo.name.to_string(),
            password_hash: hash_password(demo.password)?,
            registration_timestamp,
            roles: demo.roles.iter().map(|r| r.to_string()).collect(),
        };
        if store.create_if_absent(&user).await? {
            inserted += 1;
        }
    }
    if inserted > 0 {
        info!(inserted, "demo users seeded");
    }
    Ok(inserted)
}
