use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// A row in the `users` table. The password hash never serializes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

const USER_COLUMNS: &str =
    "id, name, email, business_name, phone, password_hash, created_at, last_login";

impl User {
    /// Find a user by email. Lookup is case-sensitive, matching how
    /// emails are stored.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Load the user row fresh from storage. Called on every request that
    /// needs the current user; there is deliberately no cache, so profile
    /// updates are visible immediately.
    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a new user with an already-hashed password. A duplicate
    /// email surfaces as a unique-violation database error.
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        business_name: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, business_name, password_hash)
            VALUES (?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(business_name)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn update_profile(
        db: &SqlitePool,
        id: i64,
        name: &str,
        business_name: &str,
        phone: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET name = ?, business_name = ?, phone = ? WHERE id = ?")
            .bind(name)
            .bind(business_name)
            .bind(phone)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn touch_last_login(db: &SqlitePool, id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(OffsetDateTime::now_utc())
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, test_pool};

    async fn setup() -> SqlitePool {
        let pool = test_pool().await;
        init_database(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_find_roundtrip() {
        let pool = setup().await;
        let user = User::create(&pool, "Ada", "ada@example.com", "Ada's Cafe", "hash")
            .await
            .unwrap();
        assert_eq!(user.name, "Ada");
        assert!(user.last_login.is_none());

        let found = User::find_by_email(&pool, "ada@example.com")
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(found.id, user.id);

        let by_id = User::find_by_id(&pool, user.id).await.unwrap();
        assert!(by_id.is_some());
        assert!(User::find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let pool = setup().await;
        User::create(&pool, "Ada", "a@b.com", "", "hash")
            .await
            .unwrap();
        let err = User::create(&pool, "Bob", "a@b.com", "", "hash")
            .await
            .expect_err("duplicate email must fail");
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = 'a@b.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let pool = setup().await;
        User::create(&pool, "Ada", "Ada@Example.com", "", "hash")
            .await
            .unwrap();
        assert!(User::find_by_email(&pool, "ada@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_profile_and_touch_last_login() {
        let pool = setup().await;
        let user = User::create(&pool, "Ada", "ada@example.com", "", "hash")
            .await
            .unwrap();

        User::update_profile(&pool, user.id, "Ada L.", "New Cafe", "+1 555-000-1111")
            .await
            .unwrap();
        User::touch_last_login(&pool, user.id).await.unwrap();

        let updated = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.business_name.as_deref(), Some("New Cafe"));
        assert_eq!(updated.phone.as_deref(), Some("+1 555-000-1111"));
        assert!(updated.last_login.is_some());
    }
}
