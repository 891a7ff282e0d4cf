use async_trait::async_trait;
use common::UserId;
use domain::User;
use sqlx::{Row, postgres::PgRow};

use super::{PostgresStore, ensure_updated};
use crate::Result;
use crate::repository::UserRepository;

const USER_COLUMNS: &str = "id, first_name, last_name, email, created_at";

fn row_to_user(row: PgRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(self.pool())
            .await?
            .map(row_to_user)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) ORDER BY id LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?
        .map(row_to_user)
        .transpose()
    }

    async fn add(&self, user: User) -> Result<UserId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(UserId::new(id))
    }

    async fn update(&self, user: User) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET first_name = $2, last_name = $3, email = $4 WHERE id = $1",
        )
        .bind(user.id.as_i64())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .execute(self.pool())
        .await?;

        ensure_updated(result.rows_affected(), "User", user.id.as_i64())
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
