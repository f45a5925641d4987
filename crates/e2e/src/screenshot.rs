//! Failure screenshots

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::E2eResult;

/// A screenshot written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedScreenshot {
    pub path: PathBuf,

    /// SHA-256 of the PNG bytes
    pub sha256: String,
}

/// Writes screenshots into one directory
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Create the store, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> E2eResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `png` under a name derived from the node id and the current time
    pub fn save(&self, node_id: &str, png: &[u8]) -> E2eResult<SavedScreenshot> {
        self.save_at(node_id, png, Local::now())
    }

    pub fn save_at(
        &self,
        node_id: &str,
        png: &[u8],
        taken_at: DateTime<Local>,
    ) -> E2eResult<SavedScreenshot> {
        let path = self.dir.join(file_name(node_id, taken_at));
        std::fs::write(&path, png)?;

        let sha256 = hash_bytes(png);
        info!("Screenshot saved: {} (sha256 {})", path.display(), &sha256[..12]);

        Ok(SavedScreenshot { path, sha256 })
    }
}

/// `<node id with :: and / replaced by _>_<YYYYmmdd_HHMMSS>.png`
pub fn file_name(node_id: &str, taken_at: DateTime<Local>) -> String {
    format!(
        "{}_{}.png",
        node_id.replace("::", "_").replace('/', "_"),
        taken_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_file_name_flattens_node_id() {
        assert_eq!(
            file_name("security::test_st_001_sql_injection", fixed_time()),
            "security_test_st_001_sql_injection_20240309_140507.png"
        );
        assert_eq!(
            file_name("tests/smoke::valid_login", fixed_time()),
            "tests_smoke_valid_login_20240309_140507.png"
        );
    }

    #[test]
    fn test_save_writes_file_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(dir.path().join("shots")).unwrap();

        let saved = store
            .save_at("smoke::page_loads", b"not really a png", fixed_time())
            .unwrap();

        assert!(saved.path.exists());
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"not really a png");
        assert_eq!(saved.sha256, hash_bytes(b"not really a png"));
        assert_eq!(saved.sha256.len(), 64);
    }
}
