//! File-backed session mirror
//!
//! The signed-in operator is stored as a small JSON document under the
//! `erp_session` key so other tools on the workstation can read it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use printshop_core::session::SessionStore;
use printshop_domain::{PrintShopError, Result, Session, SessionConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    erp_session: Session,
}

/// `SessionStore` writing to a single JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PrintShopError::Internal(format!("Failed to read session file: {e}")))
            }
        };

        // A mirror that no longer parses is treated as signed out
        match serde_json::from_str::<SessionFile>(&raw) {
            Ok(file) => Ok(Some(file.erp_session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PrintShopError::Internal(format!("Failed to create session directory: {e}"))
            })?;
        }
        let body = serde_json::to_string_pretty(&SessionFile { erp_session: session.clone() })
            .map_err(|e| PrintShopError::Internal(format!("Failed to encode session: {e}")))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| PrintShopError::Internal(format!("Failed to write session file: {e}")))?;
        debug!(path = %self.path.display(), "Session mirror written");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PrintShopError::Internal(format!("Failed to remove session file: {e}"))),
        }
    }
}
