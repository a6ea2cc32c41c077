// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Schema history laid out on disk as `<root>/<account>/<block_num>.abi`.
//!
//! Each file holds one schema document (JSON or binary `abi_def`) published
//! by `account` in block `block_num`.

use super::{SchemaBlob, SchemaStore, StoreError};
use std::path::{Path, PathBuf};

pub const SCHEMA_FILE_EXTENSION: &str = "abi";

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Publication blocks available for `account`, unordered.
    async fn publications(&self, account: &str) -> Result<Vec<u32>, StoreError> {
        let dir = self.root.join(account);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut blocks = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SCHEMA_FILE_EXTENSION) {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            {
                Some(block_num) => blocks.push(block_num),
                None => tracing::debug!("Ignoring schema file {}", path.display()),
            }
        }
        Ok(blocks)
    }
}

impl SchemaStore for DirectoryStore {
    async fn account_schema(
        &self,
        account: &str,
        block_num: u32,
    ) -> Result<Option<SchemaBlob>, StoreError> {
        let published = self
            .publications(account)
            .await?
            .into_iter()
            .filter(|b| *b <= block_num)
            .max();

        let Some(published) = published else {
            return Ok(None);
        };

        let path = self
            .root
            .join(account)
            .join(format!("{}.{}", published, SCHEMA_FILE_EXTENSION));
        let data = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        Ok(Some(SchemaBlob {
            block_num: published,
            data,
        }))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let dir = TempDir::new().unwrap();
        let account = dir.path().join("eosio.token");
        std::fs::create_dir_all(&account).unwrap();
        std::fs::write(account.join("10.abi"), b"first").unwrap();
        std::fs::write(account.join("250.abi"), b"second").unwrap();
        std::fs::write(account.join("notes.txt"), b"ignored").unwrap();
        std::fs::write(account.join("latest.abi"), b"ignored").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_picks_latest_publication_at_or_before_height() {
        let dir = layout();
        let store = DirectoryStore::new(dir.path());

        let blob = store.account_schema("eosio.token", 300).await.unwrap().unwrap();
        assert_eq!(blob.block_num, 250);
        assert_eq!(blob.data, b"second");

        let blob = store.account_schema("eosio.token", 249).await.unwrap().unwrap();
        assert_eq!(blob.block_num, 10);

        let blob = store.account_schema("eosio.token", 10).await.unwrap().unwrap();
        assert_eq!(blob.data, b"first");
    }

    #[tokio::test]
    async fn test_missing_account_or_early_height() {
        let dir = layout();
        let store = DirectoryStore::new(dir.path());

        assert!(store.account_schema("eosio.token", 9).await.unwrap().is_none());
        assert!(store.account_schema("unknown", 1000).await.unwrap().is_none());
    }
}
