//! ListProfiles - Query handler returning every stored profile.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::profile::ProfileRecord;
use crate::ports::ProfileStore;

/// Query for all stored profiles.
#[derive(Debug, Clone, Default)]
pub struct ListProfilesQuery;

/// Every record currently in the store, in backend order.
#[derive(Debug, Clone)]
pub struct ListProfilesResult {
    pub profiles: Vec<ProfileRecord>,
}

impl ListProfilesResult {
    pub fn count(&self) -> usize {
        self.profiles.len()
    }
}

/// Handler for listing profiles.
pub struct ListProfilesHandler {
    store: Arc<dyn ProfileStore>,
}

impl ListProfilesHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListProfilesQuery) -> Result<ListProfilesResult, DomainError> {
        match self.store.scan_all().await {
            Ok(profiles) => {
                tracing::info!(count = profiles.len(), "Retrieved profiles from table storage");
                Ok(ListProfilesResult { profiles })
            }
            Err(e) => {
                tracing::error!(error = %e, "Error occurred while retrieving profiles");
                Err(e)
            }
        }
    }
}
