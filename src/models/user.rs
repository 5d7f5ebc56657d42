use serde::Serialize;
use uuid::Uuid;
use chrono::Utc;

#[derive(sqlx::FromRow, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub struct GetUserCredentials {
    pub user_id: Uuid,
    pub password: String,
}
