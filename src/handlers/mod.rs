pub mod activity;
pub mod auth;
pub mod profile;

use actix_web::HttpResponse;

// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Carbon Footprint Tracker API is running")
}
