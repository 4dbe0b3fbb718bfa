//! Persistence seam
//!
//! The designer never talks to storage itself. A session builds a
//! `SaveRequest`, the host awaits an `AutomationStore`, and the result goes
//! back to the session.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::automation::AutomationDocument;

/// Snapshot of everything a save writes
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub document: AutomationDocument,
}

impl SaveRequest {
    /// Existing automation id; `None` means create
    pub fn id(&self) -> Option<&str> {
        self.document.id.as_deref()
    }

    pub fn is_update(&self) -> bool {
        self.document.id.is_some()
    }
}

/// Errors reported by a store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Could not reach the store
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but refused the request
    #[error("Store rejected the request: {0}")]
    Rejected(String),

    #[error("Automation not found: {0}")]
    NotFound(String),

    /// The response could not be understood
    #[error("Unexpected store response: {0}")]
    InvalidResponse(String),
}

/// Where automations are persisted
#[async_trait]
pub trait AutomationStore: Send + Sync {
    /// Create or update; returns the automation id
    async fn save(&self, request: &SaveRequest) -> Result<String, StoreError>;

    /// Fetch the raw stored payload, for lenient loading
    async fn fetch(&self, id: &str) -> Result<Value, StoreError>;
}

/// Process-local store
#[derive(Default)]
pub struct MemoryAutomationStore {
    automations: Mutex<HashMap<String, Value>>,
    fail_next: Mutex<Option<StoreError>>,
}

impl MemoryAutomationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `save` fail with `error`
    pub async fn fail_next_save(&self, error: StoreError) {
        *self.fail_next.lock().await = Some(error);
    }

    pub async fn len(&self) -> usize {
        self.automations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.automations.lock().await.is_empty()
    }
}

#[async_trait]
impl AutomationStore for MemoryAutomationStore {
    async fn save(&self, request: &SaveRequest) -> Result<String, StoreError> {
        if let Some(error) = self.fail_next.lock().await.take() {
            return Err(error);
        }

        let mut automations = self.automations.lock().await;
        let id = match request.id() {
            Some(id) if automations.contains_key(id) => id.to_string(),
            Some(id) => return Err(StoreError::NotFound(id.to_string())),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let mut document = request.document.clone();
        document.id = Some(id.clone());
        let payload = serde_json::to_value(&document)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        automations.insert(id.clone(), payload);
        log::debug!("Stored automation {}", id);
        Ok(id)
    }

    async fn fetch(&self, id: &str) -> Result<Value, StoreError> {
        self.automations
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
