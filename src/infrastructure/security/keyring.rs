use crate::domain::error::{AppError, Result};
use keyring::Entry;

/// OS keychain access for completion API keys, scoped to one service name.
pub struct KeyringManager {
    service: String,
}

impl KeyringManager {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    pub fn set_secret(&self, key: &str, secret: &str) -> Result<()> {
        self.entry(key)?
            .set_password(secret)
            .map_err(|e| AppError::SecurityError(format!("Failed to store '{}': {}", key, e)))
    }

    pub fn get_secret(&self, key: &str) -> Result<String> {
        self.entry(key)?
            .get_password()
            .map_err(|e| AppError::SecurityError(format!("Failed to read '{}': {}", key, e)))
    }

    pub fn delete_secret(&self, key: &str) -> Result<()> {
        self.entry(key)?
            .delete_credential()
            .map_err(|e| AppError::SecurityError(format!("Failed to delete '{}': {}", key, e)))
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|e| {
            AppError::SecurityError(format!("Failed to open keychain entry '{}': {}", key, e))
        })
    }
}
