use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::services::AttachmentSource;

/// Reads attachments straight from the local filesystem.
pub struct FsAttachmentSource;

#[async_trait]
impl AttachmentSource for FsAttachmentSource {
    async fn size(&self, path: &Path) -> AppResult<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn read(&self, path: &Path) -> AppResult<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use temp_dir::TempDir;

    use super::*;
    use crate::services::attachments::encode_batch;

    #[tokio::test]
    async fn encodes_files_from_disk() {
        let dir = TempDir::new().unwrap();
        let image = dir.child("captura.png");
        std::fs::write(&image, b"png-bytes").unwrap();

        let batch = encode_batch(&FsAttachmentSource, &[image]).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].filename, "captura.png");
        assert_eq!(batch[0].data, "data:image/png;base64,cG5nLWJ5dGVz");
    }

    #[tokio::test]
    async fn reports_file_size_without_reading() {
        let dir = TempDir::new().unwrap();
        let image = dir.child("captura.png");
        std::fs::write(&image, vec![0u8; 1500]).unwrap();

        assert_eq!(FsAttachmentSource.size(&image).await.unwrap(), 1500);
        assert!(FsAttachmentSource.size(&dir.child("nada.png")).await.is_err());
    }

    #[tokio::test]
    async fn missing_file_fails_the_batch() {
        let dir = TempDir::new().unwrap();
        let present = dir.child("a.png");
        std::fs::write(&present, b"a").unwrap();

        let result = encode_batch(&FsAttachmentSource, &[present, dir.child("b.png")]).await;

        assert!(result.is_err());
    }
}
