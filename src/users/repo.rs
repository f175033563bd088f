use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::filter::UserFilter;
use super::repo_types::{User, UserProfile};

/// Persistence seam for users. Handlers only ever see `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Fails if the email is already taken.
    async fn create(&self, user: &User) -> anyhow::Result<User>;

    /// Returns `false` without touching the existing row if the email is taken.
    async fn create_if_absent(&self, user: &User) -> anyhow::Result<bool>;

    /// Overwrites the mutable columns (name, password, roles).
    async fn update(&self, user: &User) -> anyhow::Result<()>;

    /// Newest registrations first.
    async fn list(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<UserProfile>>;

    async fn delete_all(&self) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT email, name, password, registration_timestamp, roles
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, user: &User) -> anyhow::Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password, registration_timestamp, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING email, name, password, registration_timestamp, roles
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.registration_timestamp)
        .bind(&user.roles)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn create_if_absent(&self, user: &User) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (email, name, password, registration_timestamp, roles)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.registration_timestamp)
        .bind(&user.roles)
        .execute(&self.db)
        .await
        .context("insert user if absent")?;
        Ok(res.rows_affected() == 1)
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET name = $2, password = $3, roles = $4
             WHERE email = $1
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.roles)
        .execute(&self.db)
        .await
        .context("update user")?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<UserProfile>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT email, name, registration_timestamp, roles FROM users",
        );
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY registration_timestamp DESC, email ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb
            .build_query_as::<UserProfile>()
            .fetch_all(&self.db)
            .await
            .context("list users")?;
        Ok(rows)
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM users")
            .execute(&self.db)
            .await
            .context("delete all users")?;
        Ok(res.rows_affected())
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    match filter {
        UserFilter::All => {}
        UserFilter::Role(role) => {
            qb.push(" WHERE ")
                .push_bind(role.clone())
                .push(" = ANY(roles)");
        }
        UserFilter::EmailDomain(domain) => {
            qb.push(" WHERE email LIKE ")
                .push_bind(format!("%@{}", escape_like(domain)))
                .push(r" ESCAPE '\'");
        }
        UserFilter::RegisteredSince(since) => {
            qb.push(" WHERE registration_timestamp >= ").push_bind(*since);
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
