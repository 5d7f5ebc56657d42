use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::errors::AppError;
use crate::models::activity::{Activity, ActivityRow};

const SELECT_COLUMNS: &str = "SELECT activity_id, user_id, date, electricity_value, water_value, gas_value, \
    waste_value, transport_mode, transport_distance, created_at, updated_at FROM activities";

fn to_activity(row: ActivityRow) -> Result<Activity, AppError> {
    let activity_id = row.activity_id;
    Activity::try_from(row).map_err(|e| {
        log::error!("Corrupt activity {}: {}", activity_id, e);
        AppError::InternalServerError("Corrupt activity record".to_string())
    })
}

pub async fn insert(pool: &PgPool, activity: &Activity) -> Result<(), AppError> {
    let usage = activity.usage();
    let emissions = activity.emissions();

    sqlx::query(
        "INSERT INTO activities (activity_id, user_id, date, \
            electricity_value, electricity_co2, water_value, water_co2, gas_value, gas_co2, \
            waste_value, waste_co2, transport_mode, transport_distance, transport_co2, \
            total_co2, created_at, updated_at) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(activity.activity_id)
    .bind(activity.user_id)
    .bind(activity.date)
    .bind(usage.electricity)
    .bind(emissions.electricity)
    .bind(usage.water)
    .bind(emissions.water)
    .bind(usage.gas)
    .bind(emissions.gas)
    .bind(usage.waste)
    .bind(emissions.waste)
    .bind(usage.transport_mode.as_str())
    .bind(usage.transport_distance)
    .bind(emissions.transport)
    .bind(emissions.total)
    .bind(activity.created_at)
    .bind(activity.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Rewrites an activity owned by `activity.user_id`. Returns false when no row matched.
pub async fn update(pool: &PgPool, activity: &Activity) -> Result<bool, AppError> {
    let usage = activity.usage();
    let emissions = activity.emissions();

    let result = sqlx::query(
        "UPDATE activities SET date = $1, \
            electricity_value = $2, electricity_co2 = $3, water_value = $4, water_co2 = $5, \
            gas_value = $6, gas_co2 = $7, waste_value = $8, waste_co2 = $9, \
            transport_mode = $10, transport_distance = $11, transport_co2 = $12, \
            total_co2 = $13, updated_at = $14 \
        WHERE activity_id = $15 AND user_id = $16",
    )
    .bind(activity.date)
    .bind(usage.electricity)
    .bind(emissions.electricity)
    .bind(usage.water)
    .bind(emissions.water)
    .bind(usage.gas)
    .bind(emissions.gas)
    .bind(usage.waste)
    .bind(emissions.waste)
    .bind(usage.transport_mode.as_str())
    .bind(usage.transport_distance)
    .bind(emissions.transport)
    .bind(emissions.total)
    .bind(activity.updated_at)
    .bind(activity.activity_id)
    .bind(activity.user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find(pool: &PgPool, user_id: Uuid, activity_id: Uuid) -> Result<Option<Activity>, AppError> {
    let row = sqlx::query_as::<_, ActivityRow>(&format!(
        "{} WHERE activity_id = $1 AND user_id = $2",
        SELECT_COLUMNS
    ))
    .bind(activity_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(to_activity).transpose()
}

/// A user's activities, newest first, optionally only those dated at or after `since`.
pub async fn list(
    pool: &PgPool,
    user_id: Uuid,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Activity>, AppError> {
    let rows = sqlx::query_as::<_, ActivityRow>(&format!(
        "{} WHERE user_id = $1 AND ($2::timestamptz IS NULL OR date >= $2) ORDER BY date DESC",
        SELECT_COLUMNS
    ))
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(to_activity).collect()
}

pub async fn delete(pool: &PgPool, user_id: Uuid, activity_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM activities WHERE activity_id = $1 AND user_id = $2")
        .bind(activity_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
