use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;
use log::info;
use crate::db;
use crate::errors::AppError;
use crate::utils::jwt::AuthUser;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 60, message = "Name is required"))]
    name: String,

    #[validate(email(message = "Invalid email format"))]
    email: Option<String>,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

// GET /api/users
pub async fn get_profile(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, AppError> {
    let profile = db::users::find_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(profile))
}

// PUT /api/users
pub async fn update_profile(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    updates: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let profile = db::users::update_profile(
        &pool,
        user.user_id,
        updates.name.trim(),
        updates.email.as_deref(),
    )
    .await?
    .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(profile))
}

// DELETE /api/users
pub async fn delete_account(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, AppError> {
    if !db::users::delete(&pool, user.user_id).await? {
        return Err(user_not_found());
    }

    info!("Deleted user {} and their activities", user.user_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User deleted" })))
}
