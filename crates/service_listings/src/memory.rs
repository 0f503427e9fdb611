use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{ServiceStore, StoreError, UserDirectory};
use crate::types::{ServicePatch, ServiceRecord, UserRecord};

/// In-memory listing store and user directory, for tests and local runs
#[derive(Default)]
pub struct InMemoryStore {
    services: RwLock<HashMap<Uuid, ServiceRecord>>,
    users: RwLock<HashMap<String, UserRecord>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user account.
    pub async fn add_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn fail_all(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a stored listing without going through the store trait.
    pub async fn get(&self, id: &Uuid) -> Option<ServiceRecord> {
        self.services.read().await.get(id).cloned()
    }

    /// Number of stored listings
    pub async fn len(&self) -> usize {
        self.services.read().await.len()
    }

    /// Whether no listings are stored
    pub async fn is_empty(&self) -> bool {
        self.services.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for InMemoryStore {
    async fn insert(&self, service: &ServiceRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.services
            .write()
            .await
            .insert(service.id, service.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ServiceRecord>, StoreError> {
        self.check_available()?;
        Ok(self.services.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &Uuid,
        patch: &ServicePatch,
    ) -> Result<Option<ServiceRecord>, StoreError> {
        self.check_available()?;
        let mut services = self.services.write().await;
        let Some(service) = services.get_mut(id) else {
            return Ok(None);
        };

        if let Some(status) = &patch.status {
            service.status = status.clone();
        }
        for (key, value) in &patch.attributes {
            service.attributes.insert(key.clone(), value.clone());
        }
        service.updated_at = Utc::now();

        Ok(Some(service.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.services.write().await.remove(id).is_some())
    }

    async fn count_by_status(&self, status: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let services = self.services.read().await;
        Ok(services.values().filter(|s| s.status == status).count() as u64)
    }

    async fn find_by_status(
        &self,
        status: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ServiceRecord>, StoreError> {
        self.check_available()?;
        let services = self.services.read().await;
        let mut matching: Vec<ServiceRecord> = services
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::Map;

    fn record(status: &str, minutes_ago: i64) -> ServiceRecord {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        ServiceRecord {
            id: Uuid::new_v4(),
            attributes: Map::new(),
            created_by: "u1".to_string(),
            creator_role: "escort".to_string(),
            agency_name: "u1@example.com".to_string(),
            status: status.to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_find_by_status_sorts_newest_first_and_pages() {
        let store = InMemoryStore::new();
        let oldest = record("Active", 30);
        let newest = record("Active", 1);
        let middle = record("Active", 10);
        let hidden = record("Inactive", 0);
        for service in [&oldest, &newest, &middle, &hidden] {
            ServiceStore::insert(&store, service).await.unwrap();
        }

        assert_eq!(store.count_by_status("Active").await.unwrap(), 3);

        let first = store.find_by_status("Active", 0, 2).await.unwrap();
        let ids: Vec<Uuid> = first.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newest.id, middle.id]);

        let second = store.find_by_status("Active", 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, oldest.id);
    }

    #[tokio::test]
    async fn test_update_merges_attributes() {
        let store = InMemoryStore::new();
        let mut service = record("Active", 5);
        service
            .attributes
            .insert("title".to_string(), serde_json::json!("Old"));
        service
            .attributes
            .insert("city".to_string(), serde_json::json!("Lisbon"));
        ServiceStore::insert(&store, &service).await.unwrap();

        let mut patch = ServicePatch::default();
        patch
            .attributes
            .insert("title".to_string(), serde_json::json!("New"));

        let updated = store.update(&service.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.attributes["title"], "New");
        assert_eq!(updated.attributes["city"], "Lisbon");
        assert_eq!(updated.status, "Active");
        assert!(store.update(&Uuid::new_v4(), &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_store_reports_unavailable() {
        let store = InMemoryStore::new();
        store.fail_all(true);
        assert!(matches!(
            store.count_by_status("Active").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
