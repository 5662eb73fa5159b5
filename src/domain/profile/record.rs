//! ProfileRecord - a Profile as it lives in the table store.

use crate::domain::foundation::{RowKey, Timestamp};

use super::Profile;

/// Name of the table every profile is written to.
pub const PROFILES_TABLE: &str = "Profiles";

/// Partition shared by all profile rows.
pub const PROFILE_PARTITION_KEY: &str = "Profile";

/// A stored profile plus its storage metadata.
///
/// The row key is assigned when the record is built, before it reaches the
/// store. `timestamp` and `etag` belong to the backend: they are `None` on a
/// freshly built record and only populated when a record is read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    profile: Profile,
    row_key: RowKey,
    created_date: Timestamp,
    timestamp: Option<Timestamp>,
    etag: Option<String>,
}

impl ProfileRecord {
    /// Builds a new record with a fresh row key and the current UTC time.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            row_key: RowKey::new(),
            created_date: Timestamp::now(),
            timestamp: None,
            etag: None,
        }
    }

    /// Reconstitutes a record read from the store.
    pub fn from_stored(
        profile: Profile,
        row_key: RowKey,
        created_date: Timestamp,
        timestamp: Option<Timestamp>,
        etag: Option<String>,
    ) -> Self {
        Self {
            profile,
            row_key,
            created_date,
            timestamp,
            etag,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn partition_key(&self) -> &'static str {
        PROFILE_PARTITION_KEY
    }

    pub fn row_key(&self) -> &RowKey {
        &self.row_key
    }

    pub fn created_date(&self) -> Timestamp {
        self.created_date
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_copies_profile_fields() {
        let profile = Profile::new("John", "Doe", "john.doe@example.com", "30");
        let record = ProfileRecord::new(profile.clone());

        assert_eq!(record.profile(), &profile);
        assert_eq!(record.partition_key(), "Profile");
    }

    #[test]
    fn new_record_has_no_backend_metadata() {
        let record = ProfileRecord::new(Profile::default());
        assert!(record.timestamp().is_none());
        assert!(record.etag().is_none());
    }

    #[test]
    fn new_records_get_distinct_row_keys() {
        let a = ProfileRecord::new(Profile::default());
        let b = ProfileRecord::new(Profile::default());
        assert_ne!(a.row_key(), b.row_key());
    }

    #[test]
    fn created_date_is_set_at_construction() {
        let before = Timestamp::now();
        let record = ProfileRecord::new(Profile::default());
        assert!(!record.created_date().is_before(&before));
    }
}
