use actix_web::{HttpResponse, Result};

/// Health check endpoint for the listings API
pub async fn listings_health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "listings",
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    })))
}

/// Plain-text liveness probe
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
