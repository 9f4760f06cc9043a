pub use crate::auth::repo_types::User;
use sqlx::PgPool;

impl User {
    /// Find a user by email. Exact match, as stored.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with an already-hashed password. The unique index
    /// on email rejects a concurrent duplicate at insert time.
    pub async fn create(
        db: &PgPool,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, first_name, last_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Replace the mutable profile fields of the row matching this user's
    /// email. Returns None when the row has vanished.
    pub async fn replace_by_email(&self, db: &PgPool) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, password_hash = $4, updated_at = $5
            WHERE email = $1
            RETURNING id, email, first_name, last_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(&self.email)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.password_hash)
        .bind(self.updated_at)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

/// True when the underlying failure is a unique-constraint violation, i.e.
/// another request inserted the same email between our lookup and insert.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .map(|e| matches!(e, sqlx::Error::Database(db) if db.is_unique_violation()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        let err = anyhow::anyhow!("something else entirely");
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        let err = anyhow::Error::from(sqlx::Error::RowNotFound);
        assert!(!is_unique_violation(&err));
    }
}
