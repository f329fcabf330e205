//! API key storage and permission checks.

use crate::config::{API_KEY_LOG_TYPE, API_KEY_PROPERTY, HISTORIC_ACCESS_PROPERTY};
use crate::error::Result;
use crate::properties::PropertyStore;
use crate::query_builder::{FieldBuilder, QueryDocument};
use serde_json::Value;
use std::fmt;

/// Result of trying to add an API key. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddKeyOutcome {
    /// The permissions object was invalid; nothing was saved.
    Rejected,
    /// Key saved and it grants historic-data access.
    SavedFullAccess,
    /// Key saved, but historic-data access is not available.
    SavedLimitedAccess,
}

impl AddKeyOutcome {
    /// User-facing message for the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            AddKeyOutcome::Rejected => "API key is not valid and has not been saved!",
            AddKeyOutcome::SavedFullAccess => "API key is valid and has been saved",
            AddKeyOutcome::SavedLimitedAccess => {
                "API key is valid and has been saved but you don't have needed permissions to access historic data!"
            }
        }
    }

    pub fn is_saved(&self) -> bool {
        !matches!(self, AddKeyOutcome::Rejected)
    }
}

impl fmt::Display for AddKeyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// `{ currentUser { permissions { spreadsheet sanbase api } } }`, sent with
/// the candidate key. The `currentUser` value is what [`validate_key`] checks.
pub fn permissions_query() -> QueryDocument {
    FieldBuilder::new("currentUser")
        .nested(FieldBuilder::new("permissions").select(&["spreadsheet", "sanbase", "api"]))
        .build()
}

/// A key is valid when the server returned an object with `permissions`.
pub fn validate_key(response: &Value) -> bool {
    response
        .as_object()
        .map(|obj| obj.contains_key("permissions"))
        .unwrap_or(false)
}

/// Valid key whose `permissions.spreadsheet` is exactly `true`.
pub fn validate_historic_access(response: &Value) -> bool {
    validate_key(response)
        && response
            .get("permissions")
            .and_then(|p| p.get("spreadsheet"))
            .and_then(Value::as_bool)
            == Some(true)
}

/// Reads and writes the API key in a borrowed [`PropertyStore`].
pub struct ApiKeyManager<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> ApiKeyManager<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    pub fn get_stored_key(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(API_KEY_PROPERTY)?
            .filter(|k| !k.is_empty()))
    }

    pub fn has_stored_key(&self) -> Result<bool> {
        Ok(self.get_stored_key()?.is_some())
    }

    pub fn set_stored_key(&self, key: &str) -> Result<()> {
        self.store.set(API_KEY_PROPERTY, key)
    }

    /// Whether the last saved key was granted historic-data access.
    pub fn has_historic_access(&self) -> Result<bool> {
        if !self.has_stored_key()? {
            return Ok(false);
        }
        Ok(self.store.get(HISTORIC_ACCESS_PROPERTY)?.as_deref() == Some("true"))
    }

    /// Validate `permissions` and save `key` accordingly.
    ///
    /// A key that passes the shape check is always saved, even without
    /// historic access; the outcome tells the caller which case applied.
    pub fn add_key(&self, key: &str, permissions: &Value) -> Result<AddKeyOutcome> {
        if !validate_key(permissions) {
            tracing::warn!(
                log_type = API_KEY_LOG_TYPE,
                "An attempt to add invalid API key has been made."
            );
            return Ok(AddKeyOutcome::Rejected);
        }

        self.set_stored_key(key)?;

        let outcome = if validate_historic_access(permissions) {
            tracing::info!(log_type = API_KEY_LOG_TYPE, "Valid API key has been added.");
            AddKeyOutcome::SavedFullAccess
        } else {
            tracing::warn!(
                log_type = API_KEY_LOG_TYPE,
                "Valid API key has been added but user doesn't have needed permissions."
            );
            AddKeyOutcome::SavedLimitedAccess
        };

        let flag = if outcome == AddKeyOutcome::SavedFullAccess {
            "true"
        } else {
            "false"
        };
        self.store.set(HISTORIC_ACCESS_PROPERTY, flag)?;

        Ok(outcome)
    }

    /// Forget the stored key and its access flag.
    pub fn remove_key(&self) -> Result<()> {
        self.store.delete(API_KEY_PROPERTY)?;
        self.store.delete(HISTORIC_ACCESS_PROPERTY)
    }
}
