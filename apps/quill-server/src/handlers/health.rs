//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_posts: Option<u64>,
}

/// Reports whether the post store answers.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let listing = state.blog.list_posts(None).await;

    let response = HealthResponse {
        status: if listing.is_ok() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        published_posts: listing.as_ref().ok().map(|page| page.total_items),
    };

    match listing {
        Ok(_) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(response)
        }
    }
}
