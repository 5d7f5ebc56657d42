use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use bcrypt::{hash, verify};
use validator::Validate;
use log::{debug, info};
use crate::db;
use crate::errors::AppError;
use crate::models::user::GetUserCredentials;
use crate::utils::jwt::{AuthUser, JwtKeys};
use crate::utils::validation::validate_payload;
use actix_web::rt::task::spawn_blocking;

const BCRYPT_COST: u32 = 10;

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters"))]
    name: String,

    #[validate(email(message = "Invalid email format"))]
    email: String,

    #[validate(length(min = 8, max = 32, message = "Password must be between 8 and 32 characters"))]
    password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    email: String,
    token: String,
}

async fn issue_token(keys: &JwtKeys, user_id: uuid::Uuid, email: &str) -> Result<String, AppError> {
    let keys = keys.clone();
    let email = email.to_string();

    spawn_blocking(move || keys.generate_token(user_id, &email))
        .await
        .map_err(|_| AppError::InternalServerError("Token generation failed".to_string()))?
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

// POST /api/auth/login
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;
    let LoginRequest { email, password } = req.into_inner();

    let GetUserCredentials { user_id, password: password_hash } = db::users::find_credentials(&pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found".to_string()))?;

    // Verify password using bcrypt
    let is_valid = spawn_blocking(move || verify(password.as_str(), &password_hash))
        .await
        .map_err(|_| AppError::InternalServerError("Password verification error".to_string()))?
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = issue_token(&keys, user_id, &email).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { email, token }))
}

// POST /api/auth/register
pub async fn register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;
    let RegisterRequest { name, email, password } = req.into_inner();

    let password_hash = spawn_blocking(move || hash(&password, BCRYPT_COST))
        .await
        .map_err(|_| AppError::InternalServerError("Hashing failed".to_string()))?
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let user_id = uuid::Uuid::now_v7();
    if !db::users::insert(&pool, user_id, name.trim(), &email, &password_hash).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }
    info!("Registered user {}", user_id);

    let token = issue_token(&keys, user_id, &email).await?;

    Ok(HttpResponse::Created().json(AuthResponse { email, token }))
}

// GET /api/auth/me
pub async fn me(user: AuthUser, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    debug!("Loading profile for {}", user.email);
    let profile = db::users::find_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_payload_rules() {
        let ok: RegisterRequest = serde_json::from_value(json!({
            "name": "Ada", "email": "ada@example.com", "password": "correct horse"
        }))
        .unwrap();
        assert!(validate_payload(&ok).is_ok());

        let bad_email: RegisterRequest = serde_json::from_value(json!({
            "name": "Ada", "email": "ada", "password": "correct horse"
        }))
        .unwrap();
        assert!(validate_payload(&bad_email).is_err());

        let short_password: RegisterRequest = serde_json::from_value(json!({
            "name": "Ada", "email": "ada@example.com", "password": "short"
        }))
        .unwrap();
        assert!(validate_payload(&short_password).is_err());

        let no_name: RegisterRequest = serde_json::from_value(json!({
            "name": "", "email": "ada@example.com", "password": "correct horse"
        }))
        .unwrap();
        assert!(validate_payload(&no_name).is_err());
    }

    #[test]
    fn login_requires_password() {
        let req: LoginRequest = serde_json::from_value(json!({ "email": "ada@example.com", "password": "" })).unwrap();
        assert!(validate_payload(&req).is_err());
    }

    #[actix_web::test]
    async fn issued_token_validates() {
        let keys = JwtKeys::new("secret", 1);
        let user_id = uuid::Uuid::now_v7();
        let token = issue_token(&keys, user_id, "ada@example.com").await.unwrap();

        let claims = keys.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
    }
}
