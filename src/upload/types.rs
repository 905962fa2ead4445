use std::path::PathBuf;

use thiserror::Error;

pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Character class removed by the cleaning service when no override is given.
pub const DEFAULT_CARACTERES: &str = r#"[.,;:!?@#$%^&*_+=|\\/<>\[\]{}()\-"\'`~]"#;

/// Cleaning switches posted alongside the file. Checked boxes travel as
/// literal `"on"` fields, unchecked boxes are omitted entirely.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub minusculo: bool,
    pub remover_especiais: bool,
    pub caracteres: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            minusculo: true,
            remover_especiais: true,
            caracteres: DEFAULT_CARACTERES.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub file_name: String,
    pub options: CleanOptions,
}

/// A status-200 exchange. Anything else surfaces as `UploadError::Status`.
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub enum UploadEvent {
    Progress { sent: u64, total: u64 },
    Completed(Result<ServerReply, UploadError>),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
}
