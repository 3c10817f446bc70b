use std::path::PathBuf;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{Backend, BackendError};

pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Backend for FileReader {
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>, BackendError> {
        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| BackendError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terraform.tfstate");
        std::fs::write(&path, b"{\"version\": 4}").unwrap();

        let bytes = FileReader::new(&path)
            .read(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(bytes, b"{\"version\": 4}");
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let err = FileReader::new("does/not/exist.tfstate")
            .read(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
        assert!(err.to_string().starts_with("unable to read does/not/exist.tfstate"));
    }
}
