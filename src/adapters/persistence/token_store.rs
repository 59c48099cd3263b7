//! Implements TokenStorePort using a JSON file.
//!
//! Keeps the X access token between runs so the PIN prompt happens once.

use crate::domain::DomainError;
use crate::ports::{OAuthToken, TokenStorePort};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenData {
    x_access: Option<OAuthToken>,
}

/// JSON file-based token storage.
pub struct JsonTokenStore {
    path: PathBuf,
}

impl JsonTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Atomic save using write-replace: temp file, sync_all, rename.
    async fn write(&self, data: &TokenData) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| DomainError::Auth(format!("encode token: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Auth(format!("create token dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Auth(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Auth(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Auth(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Auth(format!("atomic rename failed: {}", e)))
    }
}

#[async_trait::async_trait]
impl TokenStorePort for JsonTokenStore {
    async fn load(&self) -> Result<Option<OAuthToken>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Auth(format!("read token file: {}", e))),
        };
        match serde_json::from_str::<TokenData>(&raw) {
            Ok(data) => Ok(data.x_access),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt token file");
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &OAuthToken) -> Result<(), DomainError> {
        self.write(&TokenData {
            x_access: Some(token.clone()),
        })
        .await
    }
}
