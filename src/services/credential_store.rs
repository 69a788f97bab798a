// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential persistence.
//!
//! The lifecycle manager only needs field-level read/write of the three
//! credential fields; the encoding is the store's concern.

use crate::error::{AppError, Result};
use crate::models::Credential;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Load and save the persisted credential.
pub trait CredentialStore {
    fn load(&self) -> Result<Credential>;
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// Credential stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credential> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let credential = serde_json::from_str(&json).map_err(|e| {
            AppError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        tracing::info!(path = %self.path.display(), "Read access token from file");
        Ok(credential)
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| AppError::Storage(format!("Failed to encode credential: {}", e)))?;

        // Write-then-rename keeps the replacement atomic.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::info!(path = %self.path.display(), "Refreshed token saved to file");
        Ok(())
    }
}

/// In-memory store, counting writes. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
    saves: Mutex<usize>,
}

impl MemoryCredentialStore {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
            saves: Mutex::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credential> {
        self.credential
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| AppError::Storage("No credential stored".to_string()))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.credential.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
