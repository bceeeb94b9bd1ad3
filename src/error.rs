use std::io;

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::validation::FieldErrors;

pub const VALIDATION_MESSAGE: &str = "Por favor corrige los campos marcados";
pub const ATTACHMENT_MESSAGE: &str = "Error al procesar las imágenes";
pub const TRANSPORT_MESSAGE: &str = "Error de conexión. Por favor, inténtalo de nuevo.";
pub const REJECTED_MESSAGE: &str = "Error al crear el ticket";
pub const IN_PROGRESS_MESSAGE: &str = "Ya se está enviando un ticket";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("attachment error: {0}")]
    Attachment(String),
    #[error("ticket service unreachable: {0}")]
    Transport(String),
    #[error("ticket service responded with {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("a submission is already in progress")]
    SubmissionInProgress,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => VALIDATION_MESSAGE.to_string(),
            AppError::Attachment(_) => ATTACHMENT_MESSAGE.to_string(),
            AppError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            AppError::Rejected { message, .. } => message
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(REJECTED_MESSAGE)
                .to_string(),
            AppError::SubmissionInProgress => IN_PROGRESS_MESSAGE.to_string(),
            AppError::Configuration(detail) => format!("Configuración inválida: {detail}"),
            AppError::Io(err) => format!("Error de lectura: {err}"),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
