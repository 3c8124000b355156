//! 凭据文件存储
//!
//! 单个 JSON 文件 `<dir>/creds.json`。写入先落临时文件再 rename，避免进程中断留下半个文件。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::SessionError;
use crate::session::AuthStateStore;

const CREDS_FILE: &str = "creds.json";

#[derive(Debug, Clone)]
pub struct FileAuthStore {
    dir: PathBuf,
}

impl FileAuthStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CREDS_FILE)
    }
}

#[async_trait]
impl AuthStateStore for FileAuthStore {
    async fn load(&self) -> Result<Option<serde_json::Value>, SessionError> {
        match tokio::fs::read_to_string(self.path()).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, creds: &serde_json::Value) -> Result<(), SessionError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.dir.join(format!("{CREDS_FILE}.tmp"));
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(creds)?).await?;
        tokio::fs::rename(&tmp, self.path()).await?;
        tracing::debug!(path = %self.path().display(), "credentials saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path().join("auth_info"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path().join("auth_info"));
        let creds = serde_json::json!({"me": {"id": "5215512345678:3@s.whatsapp.net"}, "registered": true});
        store.save(&creds).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(creds));
        assert!(!dir.path().join("auth_info/creds.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("creds.json"), "{not json").unwrap();
        let store = FileAuthStore::new(dir.path());
        assert!(matches!(store.load().await, Err(SessionError::Json(_))));
    }
}
