mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod utils;

use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use log::{error, info};
use env_logger::Env;
use actix_web::middleware::Logger;
use actix_web_httpauth::middleware::HttpAuthentication;
use std::collections::HashMap;
use std::io;
use crate::config::AppConfig;
use crate::utils::jwt::{validator, JwtKeys};
use crate::utils::validation::{json_error_handler, path_error_handler, query_error_handler};

/// Registers every route. Shared application data is added by the caller.
fn configure(cfg: &mut web::ServiceConfig) {
    let auth = HttpAuthentication::bearer(validator);

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(web::resource("/").route(web::get().to(handlers::index)))
        .service(
            web::resource("/api/auth/register")
                .route(web::post().to(handlers::auth::register)),
        )
        .service(
            web::resource("/api/auth/login")
                .route(web::post().to(handlers::auth::login)),
        )
        .service(
            web::resource("/api/auth/me")
                .wrap(auth.clone())
                .route(web::get().to(handlers::auth::me)),
        )
        .service(
            web::resource("/api/users")
                .wrap(auth.clone())
                .route(web::get().to(handlers::profile::get_profile))
                .route(web::put().to(handlers::profile::update_profile))
                .route(web::delete().to(handlers::profile::delete_account)),
        )
        .service(
            web::resource("/api/activities")
                .wrap(auth.clone())
                .route(web::get().to(handlers::activity::get_activities))
                .route(web::post().to(handlers::activity::create_activity)),
        )
        .service(
            web::resource("/api/activities/summary/{period}")
                .wrap(auth.clone())
                .route(web::get().to(handlers::activity::get_summary)),
        )
        // Before `{activityId}` so "trend" is not taken for an id.
        .service(
            web::resource("/api/activities/trend")
                .wrap(auth.clone())
                .route(web::get().to(handlers::activity::get_trend)),
        )
        .service(
            web::resource("/api/activities/{activityId}")
                .wrap(auth)
                .route(web::get().to(handlers::activity::get_activity))
                .route(web::put().to(handlers::activity::update_activity))
                .route(web::delete().to(handlers::activity::delete_activity)),
        );
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config).await.map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let keys = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours);

    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "carbon_tracker".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    info!("Starting server at {} with {} workers", config.bind_address, config.workers);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(keys.clone()))
            .configure(configure)
    })
    .workers(config.workers)
    .bind(&config.bind_address)?
    .run()
    .await
}
