use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::config_directory;
use crate::domain::draft::TicketDraft;
use crate::error::{AppError, AppResult};

const DRAFT_FILE_NAME: &str = "pending_draft.json";

#[derive(Default, Serialize, Deserialize)]
struct DraftFile {
    draft: Option<TicketDraft>,
}

/// The last draft that failed to go out, kept for `submit --resume`.
/// Attachment payloads are not persisted.
pub struct DraftStore {
    file_path: PathBuf,
    file: DraftFile,
}

impl DraftStore {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_directory()?)
    }

    pub fn load_from(dir: &Path) -> AppResult<Self> {
        let path = dir.join(DRAFT_FILE_NAME);
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<DraftFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid draft file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => DraftFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn get(&self) -> Option<TicketDraft> {
        self.file.draft.clone()
    }

    pub fn put(&mut self, draft: &TicketDraft) {
        self.file.draft = Some(draft.clone());
    }

    pub fn clear(&mut self) {
        self.file.draft = None;
    }

    pub fn save(&self) -> AppResult<()> {
        if self.file.draft.is_none() {
            return match fs::remove_file(&self.file_path) {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(AppError::Io(err)),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write draft: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}
