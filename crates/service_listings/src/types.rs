use auth_services::policy::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::StoreError;

/// Status of listings shown on the public listing page
pub const ACTIVE_STATUS: &str = "Active";

/// Body keys owned by the server; clients can never set them
pub const PROTECTED_FIELDS: [&str; 6] = [
    "id",
    "createdBy",
    "creatorRole",
    "agencyName",
    "createdAt",
    "updatedAt",
];

/// A service listing as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Unique identifier for the listing
    pub id: Uuid,
    /// Free-form listing fields supplied by the client (title, description, rates, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    /// ID of the user who created the listing; never changes
    pub created_by: String,
    /// Role of the creator at creation time
    pub creator_role: String,
    /// Agency name of the creator, copied at creation time
    pub agency_name: String,
    /// Publication status (e.g. "Active")
    pub status: String,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated
    pub updated_at: DateTime<Utc>,
}

/// The parts of a user account this crate reads
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: String,
    /// Email address of the user
    pub email: String,
    /// Agency name, if the user registered one
    pub agency_name: Option<String>,
}

impl UserRecord {
    /// Name shown on the user's listings: the agency name, or the email when unset.
    pub fn display_name(&self) -> &str {
        self.agency_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Changes applied to an existing listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    /// New status, if supplied
    pub status: Option<String>,
    /// Attribute keys to overwrite; keys not present are left untouched
    pub attributes: Map<String, Value>,
}

/// Response structure for a deleted listing
#[derive(Debug, Serialize)]
pub struct DeleteServiceResponse {
    /// Confirmation message
    pub message: String,
}

/// Pagination metadata for a page of listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total number of active listings
    pub total: u64,
    /// Number of pages
    pub total_pages: u64,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

/// Response structure for browsing listings
#[derive(Debug, Serialize)]
pub struct ListServicesResponse {
    /// Listings on this page, newest first
    pub services: Vec<ServiceRecord>,
    /// Pagination metadata
    pub pagination: PageInfo,
}

/// Custom error type for listing operations
#[derive(thiserror::Error, Debug)]
pub enum ListingError {
    /// Missing or invalid token, or a role without listing permissions
    #[error("Unauthorized")]
    Unauthorized,

    /// Listing not found
    #[error("Service not found")]
    NotFound,

    /// Caller is neither the creator nor an admin
    #[error("Forbidden - You can only {} your own profiles", action_verb(.0))]
    Forbidden(Operation),

    /// Request body could not be used
    #[error("{0}")]
    InvalidBody(String),

    /// The creating user's account does not exist
    #[error("Creator account {0} not found")]
    CreatorNotFound(String),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

fn action_verb(operation: &Operation) -> &'static str {
    match operation {
        Operation::Delete => "delete",
        _ => "edit",
    }
}

impl actix_web::ResponseError for ListingError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            ListingError::Unauthorized | ListingError::Forbidden(_) => StatusCode::FORBIDDEN,
            ListingError::NotFound => StatusCode::NOT_FOUND,
            ListingError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ListingError::CreatorNotFound(_) | ListingError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        let message = match self {
            ListingError::CreatorNotFound(_) | ListingError::Store(_) => {
                "Internal Server Error".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = UserRecord {
            id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            agency_name: Some("Velvet Agency".to_string()),
        };
        assert_eq!(user.display_name(), "Velvet Agency");

        user.agency_name = Some(String::new());
        assert_eq!(user.display_name(), "jane@example.com");

        user.agency_name = None;
        assert_eq!(user.display_name(), "jane@example.com");
    }

    #[test]
    fn test_forbidden_messages() {
        assert_eq!(
            ListingError::Forbidden(Operation::Update).to_string(),
            "Forbidden - You can only edit your own profiles"
        );
        assert_eq!(
            ListingError::Forbidden(Operation::Delete).to_string(),
            "Forbidden - You can only delete your own profiles"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ListingError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ListingError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ListingError::InvalidBody("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ListingError::CreatorNotFound("u1".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_record_serializes_attributes_inline() {
        let record = ServiceRecord {
            id: Uuid::nil(),
            attributes: serde_json::json!({ "title": "Evening tour" })
                .as_object()
                .cloned()
                .unwrap(),
            created_by: "u1".to_string(),
            creator_role: "escort".to_string(),
            agency_name: "jane@example.com".to_string(),
            status: ACTIVE_STATUS.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Evening tour");
        assert_eq!(json["createdBy"], "u1");
        assert_eq!(json["creatorRole"], "escort");
        assert_eq!(json["status"], "Active");
        assert!(json.get("attributes").is_none());
    }
}
