mod controller;
mod progress;
mod types;

pub use controller::UploadController;
pub use types::{
    CleanOptions, ServerReply, UploadError, UploadEvent, UploadRequest, DEFAULT_CARACTERES,
    XLSX_MIME,
};
