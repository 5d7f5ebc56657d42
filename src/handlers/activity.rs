use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;
use uuid::Uuid;
use chrono::{Duration, Local, Utc};
use log::info;
use crate::db;
use crate::models::activity::{
    Activity, TransportMode, Usage, DISTANCE_UNIT, ELECTRICITY_UNIT, GAS_UNIT, WASTE_UNIT, WATER_UNIT,
};
use crate::models::summary::{DailyTotal, Summary};
use crate::services::period::{start_of_day, Period};
use crate::services::summary::{aggregate, daily_trend};
use crate::errors::AppError;
use crate::utils::jwt::AuthUser;
use crate::utils::validation::{parse_activity_date, validate_payload};

#[derive(Deserialize, Validate, Default, Clone, Copy, Debug)]
#[serde(default)]
pub struct UsageInput {
    #[validate(range(min = 0.0, max = 1_000_000_000.0, message = "Value must be between 0 and 1000000000"))]
    value: f64,
}

#[derive(Deserialize, Validate, Default, Clone, Copy, Debug)]
#[serde(default)]
pub struct TransportInput {
    #[serde(rename = "type")]
    mode: TransportMode,

    #[validate(range(min = 0.0, max = 1_000_000_000.0, message = "Transport distance must be between 0 and 1000000000"))]
    distance: f64,
}

/// Body of create and update requests. Omitted categories keep their
/// previous value on update and are zero on create.
#[derive(Deserialize, Validate, Default, Debug)]
pub struct ActivityRequest {
    date: Option<String>,

    #[validate]
    electricity: Option<UsageInput>,

    #[validate]
    water: Option<UsageInput>,

    #[validate]
    gas: Option<UsageInput>,

    #[validate]
    waste: Option<UsageInput>,

    #[validate]
    transport: Option<TransportInput>,
}

impl ActivityRequest {
    fn apply_to(&self, base: Usage) -> Usage {
        let (transport_mode, transport_distance) = match self.transport {
            Some(transport) => (transport.mode, transport.distance),
            None => (base.transport_mode, base.transport_distance),
        };

        Usage {
            electricity: self.electricity.map_or(base.electricity, |u| u.value),
            water: self.water.map_or(base.water, |u| u.value),
            gas: self.gas.map_or(base.gas, |u| u.value),
            waste: self.waste.map_or(base.waste, |u| u.value),
            transport_mode,
            transport_distance,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UsageResponse {
    value: f64,
    unit: &'static str,
    co2_equivalent: f64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TransportResponse {
    #[serde(rename = "type")]
    mode: TransportMode,
    distance: f64,
    unit: &'static str,
    co2_equivalent: f64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    id: Uuid,
    user_id: Uuid,
    date: String,
    electricity: UsageResponse,
    water: UsageResponse,
    gas: UsageResponse,
    waste: UsageResponse,
    transport: TransportResponse,
    #[serde(rename = "totalCO2")]
    total_co2: f64,
    created_at: String,
    updated_at: String,
}

impl From<&Activity> for ActivityResponse {
    fn from(activity: &Activity) -> Self {
        let usage = activity.usage();
        let emissions = activity.emissions();
        let category = |value: f64, unit: &'static str, co2_equivalent: f64| UsageResponse { value, unit, co2_equivalent };

        ActivityResponse {
            id: activity.activity_id,
            user_id: activity.user_id,
            date: activity.date.to_rfc3339(),
            electricity: category(usage.electricity, ELECTRICITY_UNIT, emissions.electricity),
            water: category(usage.water, WATER_UNIT, emissions.water),
            gas: category(usage.gas, GAS_UNIT, emissions.gas),
            waste: category(usage.waste, WASTE_UNIT, emissions.waste),
            transport: TransportResponse {
                mode: usage.transport_mode,
                distance: usage.transport_distance,
                unit: DISTANCE_UNIT,
                co2_equivalent: emissions.transport,
            },
            total_co2: emissions.total,
            created_at: activity.created_at.to_rfc3339(),
            updated_at: activity.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    period: Period,
    #[serde(flatten)]
    summary: Summary,
}

const DEFAULT_TREND_DAYS: u32 = 7;

#[derive(Deserialize, Validate)]
pub struct TrendQuery {
    #[validate(range(min = 1, max = 366, message = "Days must be between 1 and 366"))]
    days: Option<u32>,
}

#[derive(Serialize)]
pub struct TrendResponse {
    days: Vec<DailyTotal>,
}

fn activity_not_found() -> AppError {
    AppError::NotFound("Activity not found".to_string())
}

// POST /api/activities
pub async fn create_activity(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    payload: web::Json<ActivityRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;

    let date = payload
        .date
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Date is required".to_string()))
        .and_then(parse_activity_date)?;

    let now = Utc::now();
    let activity = Activity::new(
        Uuid::new_v4(),
        user.user_id,
        date,
        payload.apply_to(Usage::default()),
        now,
        now,
    );

    db::activities::insert(&pool, &activity).await?;
    info!(
        "Activity {} created for user {} ({:.2} kg CO2)",
        activity.activity_id,
        user.user_id,
        activity.emissions().total
    );

    Ok(HttpResponse::Created().json(ActivityResponse::from(&activity)))
}

// GET /api/activities
pub async fn get_activities(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, AppError> {
    let activities = db::activities::list(&pool, user.user_id, None).await?;
    let response: Vec<ActivityResponse> = activities.iter().map(ActivityResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

// GET /api/activities/{id}
pub async fn get_activity(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    activity_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let activity = db::activities::find(&pool, user.user_id, *activity_id)
        .await?
        .ok_or_else(activity_not_found)?;

    Ok(HttpResponse::Ok().json(ActivityResponse::from(&activity)))
}

// PUT /api/activities/{id}
pub async fn update_activity(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    activity_id: web::Path<Uuid>,
    payload: web::Json<ActivityRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;

    let mut activity = db::activities::find(&pool, user.user_id, *activity_id)
        .await?
        .ok_or_else(activity_not_found)?;

    if let Some(raw) = payload.date.as_deref() {
        activity.date = parse_activity_date(raw)?;
    }
    activity.set_usage(payload.apply_to(*activity.usage()));
    activity.updated_at = Utc::now();

    if !db::activities::update(&pool, &activity).await? {
        return Err(activity_not_found());
    }

    Ok(HttpResponse::Ok().json(ActivityResponse::from(&activity)))
}

// DELETE /api/activities/{id}
pub async fn delete_activity(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    activity_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !db::activities::delete(&pool, user.user_id, *activity_id).await? {
        return Err(activity_not_found());
    }

    info!("Activity {} deleted by user {}", *activity_id, user.user_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Activity removed" })))
}

// GET /api/activities/summary/{period}
pub async fn get_summary(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    period: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let period: Period = period.parse()?;
    let period_start = period.start_at(&Local::now())?.with_timezone(&Utc);

    let activities = db::activities::list(&pool, user.user_id, Some(period_start)).await?;
    let summary = aggregate(&activities, period_start);

    Ok(HttpResponse::Ok().json(SummaryResponse { period, summary }))
}

// GET /api/activities/trend?days=N
pub async fn get_trend(
    user: AuthUser,
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<TrendQuery>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*query)?;
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);

    let today = Local::now().date_naive();
    let first_day = today - Duration::days(i64::from(days - 1));
    let since = start_of_day(&Local, first_day)?.with_timezone(&Utc);

    let activities = db::activities::list(&pool, user.user_id, Some(since)).await?;

    Ok(HttpResponse::Ok().json(TrendResponse {
        days: daily_trend(&activities, today, days, &Local),
    }))
}
