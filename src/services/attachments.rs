use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use mime_guess::mime;
use tracing::{debug, warn};

use crate::domain::ticket::Attachment;
use crate::error::{AppError, AppResult};

/// Largest file accepted as an attachment (10 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

#[async_trait]
pub trait AttachmentSource: Send + Sync {
    async fn size(&self, path: &Path) -> AppResult<u64>;
    async fn read(&self, path: &Path) -> AppResult<Vec<u8>>;
}

/// MIME type of `path` when it names an image.
pub fn image_mime(path: &Path) -> Option<mime::Mime> {
    mime_guess::from_path(path)
        .first()
        .filter(|guess| guess.type_() == mime::IMAGE)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads and encodes one selection of files concurrently. Non-image files are
/// skipped. A file over [`MAX_ATTACHMENT_BYTES`] or a failed read fails the
/// whole batch and nothing is returned.
pub async fn encode_batch(
    source: &dyn AttachmentSource,
    paths: &[PathBuf],
) -> AppResult<Vec<Attachment>> {
    let images = paths
        .iter()
        .filter_map(|path| match image_mime(path) {
            Some(mime) => Some((path, mime)),
            None => {
                warn!(file = %path.display(), "skipping non-image attachment");
                None
            }
        })
        .collect::<Vec<_>>();

    let reads = images.into_iter().map(|(path, mime)| async move {
        let failed = |err: AppError| AppError::Attachment(format!("{}: {err}", path.display()));
        let size = source.size(path).await.map_err(failed)?;
        if size > MAX_ATTACHMENT_BYTES {
            return Err(too_large(path, size));
        }
        let bytes = source.read(path).await.map_err(failed)?;
        if bytes.len() as u64 > MAX_ATTACHMENT_BYTES {
            return Err(too_large(path, bytes.len() as u64));
        }
        debug!(file = %path.display(), bytes = bytes.len(), "encoded attachment");
        Ok::<_, AppError>(Attachment::encode(
            display_name(path),
            mime.essence_str(),
            &bytes,
        ))
    });

    try_join_all(reads).await
}

fn too_large(path: &Path, size: u64) -> AppError {
    AppError::Attachment(format!(
        "{}: {size} bytes exceeds the {MAX_ATTACHMENT_BYTES} byte limit",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use super::*;

    #[derive(Default)]
    struct MemorySource {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl MemorySource {
        fn with(mut self, path: &str, bytes: &[u8]) -> Self {
            self.files.insert(PathBuf::from(path), bytes.to_vec());
            self
        }
    }

    #[async_trait]
    impl AttachmentSource for MemorySource {
        async fn size(&self, path: &Path) -> AppResult<u64> {
            Ok(self.files.get(path).map_or(0, |bytes| bytes.len() as u64))
        }

        async fn read(&self, path: &Path) -> AppResult<Vec<u8>> {
            self.files.get(path).cloned().ok_or_else(|| {
                AppError::Io(io::Error::new(io::ErrorKind::NotFound, "missing file"))
            })
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn encodes_every_file_in_order() {
        let source = MemorySource::default()
            .with("shots/uno.png", b"1")
            .with("shots/dos.jpg", b"22")
            .with("shots/tres.gif", b"333");

        let batch = encode_batch(
            &source,
            &paths(&["shots/uno.png", "shots/dos.jpg", "shots/tres.gif"]),
        )
        .await
        .unwrap();

        let names = batch
            .iter()
            .map(|attachment| attachment.filename.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["uno.png", "dos.jpg", "tres.gif"]);
        assert_eq!(batch[0].data, "data:image/png;base64,MQ==");
        assert_eq!(batch[1].mime_type(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn one_failed_read_fails_the_batch() {
        let source = MemorySource::default()
            .with("uno.png", b"1")
            .with("tres.png", b"3");

        let result = encode_batch(&source, &paths(&["uno.png", "dos.png", "tres.png"])).await;

        match result {
            Err(AppError::Attachment(detail)) => assert!(detail.contains("dos.png")),
            other => panic!("expected attachment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_file_fails_the_batch() {
        let limit = MAX_ATTACHMENT_BYTES as usize;
        let source = MemorySource::default()
            .with("ok.png", &vec![0; limit])
            .with("enorme.png", &vec![0; limit + 1]);

        let result = encode_batch(&source, &paths(&["ok.png", "enorme.png"])).await;

        match result {
            Err(AppError::Attachment(detail)) => assert!(detail.contains("enorme.png")),
            other => panic!("expected attachment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn skips_non_images() {
        let source = MemorySource::default()
            .with("foto.png", b"1")
            .with("informe.pdf", b"%PDF");

        let batch = encode_batch(&source, &paths(&["informe.pdf", "foto.png"]))
            .await
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].filename, "foto.png");
    }
}
