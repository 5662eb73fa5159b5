//! SaveProfile - Command handler for registering a profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, RowKey};
use crate::domain::profile::{Profile, ProfileRecord};
use crate::ports::ProfileStore;

/// Command to store a new profile.
#[derive(Debug, Clone)]
pub struct SaveProfileCommand {
    pub profile: Profile,
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveProfileResult {
    pub row_key: RowKey,
}

/// Handler for saving profiles.
pub struct SaveProfileHandler {
    store: Arc<dyn ProfileStore>,
}

impl SaveProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: SaveProfileCommand) -> Result<SaveProfileResult, DomainError> {
        // 1. Build the record; this assigns the row key
        let record = ProfileRecord::new(cmd.profile);

        // 2. Create the table on first use, then insert
        let stored = async {
            self.store.ensure_table().await?;
            self.store.insert(&record).await
        }
        .await;

        if let Err(e) = stored {
            tracing::error!(error = %e, "Error occurred while saving profile");
            return Err(e);
        }

        tracing::info!(row_key = %record.row_key(), "Profile saved successfully");

        Ok(SaveProfileResult {
            row_key: record.row_key().clone(),
        })
    }
}
