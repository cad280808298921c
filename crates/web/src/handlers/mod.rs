use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    routing::get,
};
use resume_site_core::config::Config;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

mod api;
mod common;
mod home;
pub mod security;
mod workflows;

pub fn build_router(config: &Config) -> Router<AppState> {
    Router::new()
        .route_service(
            "/resume.pdf",
            <ServeFile as ServiceExt<Request>>::map_response(
                ServeFile::new(&config.site.resume_path),
                |mut response| {
                    response.headers_mut().insert(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("public, max-age=3600, must-revalidate"),
                    );
                    response
                },
            ),
        )
        .fallback_service(<ServeDir as ServiceExt<Request>>::map_response(
            ServeDir::new(&config.site.static_dir),
            |mut response| {
                // Cache public files for a day, mark must-revalidate
                response.headers_mut().insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400, must-revalidate"),
                );
                response
            },
        ))
        .route("/", get(home::home))
        .route("/workflows", get(workflows::workflows))
        .route("/api/workflows", get(api::get_workflows))
        .route("/api/health", get(api::health))
        .route("/api/ready", get(api::ready))
}
