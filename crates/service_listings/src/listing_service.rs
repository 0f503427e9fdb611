use std::sync::Arc;

use auth_services::policy::{Decision, Denial, Operation, Ownership, authorize};
use auth_services::types::Identity;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::pagination::Pagination;
use crate::store::{ServiceStore, UserDirectory};
use crate::types::*;

/// Checks that the caller may attempt `operation` at all, before any record is loaded.
///
/// A missing identity and a role without listing permissions are treated alike.
pub fn require_caller(
    operation: Operation,
    caller: Option<&Identity>,
) -> Result<&Identity, ListingError> {
    let identity = caller.ok_or(ListingError::Unauthorized)?;
    match authorize(operation, &identity.role, Ownership::NotApplicable) {
        Decision::Allow => Ok(identity),
        Decision::Deny(_) => Err(ListingError::Unauthorized),
    }
}

/// Service for handling listing operations
pub struct ListingService {
    services: Arc<dyn ServiceStore>,
    users: Arc<dyn UserDirectory>,
}

impl ListingService {
    /// Creates a new `ListingService` over the given stores
    pub fn new(services: Arc<dyn ServiceStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { services, users }
    }

    /// Creates a listing owned by the caller.
    ///
    /// Server-owned fields in the body are ignored; `status` defaults to "Active".
    pub async fn create(
        &self,
        caller: &Identity,
        body: Map<String, Value>,
    ) -> Result<ServiceRecord, ListingError> {
        require_caller(Operation::Create, Some(caller))?;

        let user = self.users.find_by_id(&caller.id).await?.ok_or_else(|| {
            log::error!("No user account found for token subject {}", caller.id);
            ListingError::CreatorNotFound(caller.id.clone())
        })?;

        let mut attributes = body;
        strip_protected_fields(&mut attributes);
        let status = take_status(&mut attributes)?.unwrap_or_else(|| ACTIVE_STATUS.to_string());

        let now = Utc::now();
        let service = ServiceRecord {
            id: Uuid::new_v4(),
            attributes,
            created_by: caller.id.clone(),
            creator_role: caller.role.to_string(),
            agency_name: user.display_name().to_string(),
            status,
            created_at: now,
            updated_at: now,
        };

        self.services.insert(&service).await?;
        log::info!("Created service {} for user {}", service.id, caller.id);

        Ok(service)
    }

    /// Merges the body into the listing named by its `id`.
    ///
    /// Only supplied keys change; server-owned fields cannot be overwritten.
    pub async fn update(
        &self,
        caller: &Identity,
        body: Map<String, Value>,
    ) -> Result<ServiceRecord, ListingError> {
        require_caller(Operation::Update, Some(caller))?;

        let id = target_id(&body)?;
        self.load_authorized(Operation::Update, caller, &id).await?;

        let mut attributes = body;
        strip_protected_fields(&mut attributes);
        let patch = ServicePatch {
            status: take_status(&mut attributes)?,
            attributes,
        };

        // The record may have been deleted since it was checked
        self.services
            .update(&id, &patch)
            .await?
            .ok_or(ListingError::NotFound)
    }

    /// Deletes the listing named by the body's `id`.
    pub async fn delete(
        &self,
        caller: &Identity,
        body: &Map<String, Value>,
    ) -> Result<DeleteServiceResponse, ListingError> {
        require_caller(Operation::Delete, Some(caller))?;

        let id = target_id(body)?;
        self.load_authorized(Operation::Delete, caller, &id).await?;

        if !self.services.delete(&id).await? {
            log::warn!("Service {} disappeared before it could be deleted", id);
        }
        log::info!("Service {} deleted by user {}", id, caller.id);

        Ok(DeleteServiceResponse {
            message: "Profile deleted successfully".to_string(),
        })
    }

    /// Returns a page of active listings, newest first.
    pub async fn list_active(
        &self,
        pagination: Pagination,
    ) -> Result<ListServicesResponse, ListingError> {
        let total = self.services.count_by_status(ACTIVE_STATUS).await?;
        let services = self
            .services
            .find_by_status(
                ACTIVE_STATUS,
                pagination.offset(),
                u64::from(pagination.limit),
            )
            .await?;

        Ok(ListServicesResponse {
            services,
            pagination: pagination.page_info(total),
        })
    }

    /// Loads a listing and checks the caller may apply `operation` to it
    async fn load_authorized(
        &self,
        operation: Operation,
        caller: &Identity,
        id: &Uuid,
    ) -> Result<ServiceRecord, ListingError> {
        let service = self
            .services
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;

        let ownership = Ownership::of(caller, &service.created_by);
        match authorize(operation, &caller.role, ownership) {
            Decision::Allow => Ok(service),
            Decision::Deny(Denial::NotOwner) => {
                log::warn!(
                    "User {} ({}) denied {:?} on service {} owned by {}",
                    caller.id,
                    caller.role,
                    operation,
                    id,
                    service.created_by
                );
                Err(ListingError::Forbidden(operation))
            }
            Decision::Deny(Denial::Role) => Err(ListingError::Unauthorized),
        }
    }
}

/// Reads the target listing id; a missing or malformed id matches no listing.
fn target_id(body: &Map<String, Value>) -> Result<Uuid, ListingError> {
    body.get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or(ListingError::NotFound)
}

fn strip_protected_fields(body: &mut Map<String, Value>) {
    for field in PROTECTED_FIELDS {
        body.remove(field);
    }
}

fn take_status(body: &mut Map<String, Value>) -> Result<Option<String>, ListingError> {
    match body.remove("status") {
        None => Ok(None),
        Some(Value::String(status)) => Ok(Some(status)),
        Some(_) => Err(ListingError::InvalidBody(
            "status must be a string".to_string(),
        )),
    }
}
