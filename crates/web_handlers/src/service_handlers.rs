use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::{Map, Value};

use auth_services::extractor::Caller;
use auth_services::policy::Operation;
use service_listings::{ListServicesQuery, ListingError, ListingService, Pagination, require_caller};

/// Parses a request body that must be a JSON object
fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>, ListingError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ListingError::InvalidBody(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ListingError::InvalidBody(format!("Invalid JSON body: {}", e))),
    }
}

/// Creates a listing owned by the authenticated caller.
/// Returns 201 Created with the stored listing.
pub async fn create_service(
    listings: web::Data<ListingService>,
    caller: Caller,
    body: web::Bytes,
) -> Result<HttpResponse, ListingError> {
    // Authorize before looking at the body
    let identity = require_caller(Operation::Create, caller.identity())?;
    let body = parse_json_object(&body)?;

    let service = listings.create(identity, body).await?;

    Ok(HttpResponse::Created().json(service))
}

/// Updates the listing named by the body's `id`; only its creator or an admin may do so
pub async fn update_service(
    listings: web::Data<ListingService>,
    caller: Caller,
    body: web::Bytes,
) -> Result<HttpResponse, ListingError> {
    let identity = require_caller(Operation::Update, caller.identity())?;
    let body = parse_json_object(&body)?;

    let updated = listings.update(identity, body).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes the listing named by the body's `id`; only its creator or an admin may do so
pub async fn delete_service(
    listings: web::Data<ListingService>,
    caller: Caller,
    body: web::Bytes,
) -> Result<HttpResponse, ListingError> {
    let identity = require_caller(Operation::Delete, caller.identity())?;
    let body = parse_json_object(&body)?;

    let response = listings.delete(identity, &body).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Lists active listings, newest first. Public.
///
/// Unusable `page`/`limit` values fall back to their defaults instead of failing.
pub async fn list_services(
    listings: web::Data<ListingService>,
    req: HttpRequest,
) -> Result<HttpResponse, ListingError> {
    let query = web::Query::<ListServicesQuery>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let pagination = Pagination::from_query(&query);

    match listings.list_active(pagination).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => {
            log::error!("Error fetching services: {}", e);
            Err(e)
        }
    }
}

/// Registers the listing routes on a scope
pub fn configure_service_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/services")
            .route(web::get().to(list_services))
            .route(web::post().to(create_service))
            .route(web::put().to(update_service))
            .route(web::delete().to(delete_service)),
    );
}
