//! In-memory `UserStore`, used by tests in place of Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::filter::UserFilter;
use super::repo::UserStore;
use super::repo_types::{User, UserProfile};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        Ok(users.get(email).cloned())
    }

    async fn create(&self, user: &User) -> anyhow::Result<User> {
        let mut users = self
            .users
            .write()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        if users.contains_key(&user.email) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_pkey\"");
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user.clone())
    }

    async fn create_if_absent(&self, user: &User) -> anyhow::Result<bool> {
        let mut users = self
            .users
            .write()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        if users.contains_key(&user.email) {
            return Ok(false);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(true)
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        if let Some(stored) = users.get_mut(&user.email) {
            stored.name = user.name.clone();
            stored.password_hash = user.password_hash.clone();
            stored.roles = user.roles.clone();
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<UserProfile>> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        let mut matching: Vec<&User> = users.values().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| {
            b.registration_timestamp
                .cmp(&a.registration_timestamp)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .map(UserProfile::from)
            .collect())
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let mut users = self
            .users
            .write()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        let n = users.len() as u64;
        users.clear();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration, OffsetDateTime};

    fn user(email: &str, at: OffsetDateTime) -> User {
        User {
            email: email.into(),
            name: email.into(),
            password_hash: "hash".into(),
            registration_timestamp: at,
            roles: vec!["user".into()],
        }
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_pages() {
        let store = MemoryUserStore::new();
        let base = datetime!(2025-01-01 0:00 UTC);
        for i in 0..5 {
            store
                .create(&user(&format!("u{i}@x.com"), base + Duration::days(i)))
                .await
                .unwrap();
        }

        let first: Vec<String> = store
            .list(&UserFilter::All, 2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(first, ["u4@x.com", "u3@x.com"]);

        let last: Vec<String> = store
            .list(&UserFilter::All, 2, 4)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(last, ["u0@x.com"]);

        assert!(store.list(&UserFilter::All, 2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_create_fails_but_create_if_absent_skips() {
        let store = MemoryUserStore::new();
        let u = user("a@x.com", datetime!(2025-01-01 0:00 UTC));
        store.create(&u).await.unwrap();
        assert!(store.create(&u).await.is_err());

        let mut other = u.clone();
        other.name = "changed".into();
        assert!(!store.create_if_absent(&other).await.unwrap());
        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.name, "a@x.com");
    }

    #[tokio::test]
    async fn update_leaves_immutable_columns_alone() {
        let store = MemoryUserStore::new();
        let created_at = datetime!(2025-01-01 0:00 UTC);
        store.create(&user("a@x.com", created_at)).await.unwrap();

        let mut changed = user("a@x.com", datetime!(1999-01-01 0:00 UTC));
        changed.roles = vec!["admin".into()];
        store.update(&changed).await.unwrap();

        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.roles, ["admin"]);
        assert_eq!(stored.registration_timestamp, created_at);
    }

    #[tokio::test]
    async fn delete_all_reports_removed_rows() {
        let store = MemoryUserStore::new();
        store
            .create(&user("a@x.com", datetime!(2025-01-01 0:00 UTC)))
            .await
            .unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }
}
