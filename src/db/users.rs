use sqlx::PgPool;
use uuid::Uuid;
use crate::errors::AppError;
use crate::models::user::{GetUserCredentials, UserProfile};

/// Returns false when the email is already registered.
pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (user_id, name, email, password, created_at, updated_at) \
        VALUES ($1, $2, $3, $4, NOW(), NOW()) \
        ON CONFLICT (email) DO NOTHING",
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_credentials(pool: &PgPool, email: &str) -> Result<Option<GetUserCredentials>, AppError> {
    let credentials = sqlx::query_as::<_, GetUserCredentials>(
        "SELECT user_id, password FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(credentials)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
    let user = sqlx::query_as::<_, UserProfile>(
        "SELECT user_id, name, email, created_at FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Updates the name and, when given, the email. Email collisions surface as `Conflict`.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    email: Option<&str>,
) -> Result<Option<UserProfile>, AppError> {
    let user = sqlx::query_as::<_, UserProfile>(
        "UPDATE users SET name = $1, email = COALESCE($2, email), updated_at = NOW() \
        WHERE user_id = $3 \
        RETURNING user_id, name, email, created_at",
    )
    .bind(name)
    .bind(email)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Deletes the user; their activities go with them.
pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
