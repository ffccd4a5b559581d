use std::{fs, path::PathBuf};

use crate::infra::error::AppError;

const STORAGE_DIR_NAME: &str = ".slack-chat-history";

/// On-disk layout: one directory under the home dir holding the
/// per-(workspace, channel) input-history files and the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub storage_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let home = dirs::home_dir().ok_or(AppError::HomeDirUnresolved)?;
        Ok(Self {
            storage_dir: home.join(STORAGE_DIR_NAME),
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.storage_dir).map_err(|source| AppError::StorageDirCreate {
            path: self.storage_dir.clone(),
            source,
        })
    }

    pub fn history_file(&self, workspace: &str, channel_id: &str) -> PathBuf {
        self.storage_dir
            .join(format!("{workspace}-{channel_id}.history"))
    }

    pub fn log_file_name(&self) -> &'static str {
        "rsc.log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_file_is_per_workspace_and_channel() {
        let layout = StorageLayout {
            storage_dir: PathBuf::from("/tmp/storage"),
        };

        assert_eq!(
            layout.history_file("acme", "C123"),
            PathBuf::from("/tmp/storage/acme-C123.history")
        );
    }

    #[test]
    fn storage_dir_lives_under_home() {
        if dirs::home_dir().is_none() {
            return;
        }
        let layout = StorageLayout::resolve().expect("layout should resolve");

        assert!(layout.storage_dir.ends_with(STORAGE_DIR_NAME));
    }
}
