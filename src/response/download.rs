use std::fs;
use std::path::{Path, PathBuf};

use crate::response::HandlerError;
use crate::upload::ServerReply;
use crate::utils::disposition;

pub const DEFAULT_DOWNLOAD_NAME: &str = "dados_processados.xlsx";

/// Writes the reply body into the download directory under the name the
/// server advertised, falling back to the fixed default when the header is
/// absent or unusable.
pub fn save_attachment(dir: &Path, reply: &ServerReply) -> Result<PathBuf, HandlerError> {
    let advertised = reply
        .content_disposition
        .as_deref()
        .and_then(disposition::extract_filename);
    let name = safe_file_name(advertised.as_deref().unwrap_or(DEFAULT_DOWNLOAD_NAME));

    let path = dir.join(name);
    fs::create_dir_all(dir).map_err(|source| HandlerError::Save {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, &reply.body).map_err(|source| HandlerError::Save {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

// The server names the file, but it must not name the directory.
fn safe_file_name(name: &str) -> &str {
    match name.rsplit(['/', '\\']).next() {
        Some(base) if !base.is_empty() && base != "." && base != ".." => base,
        _ => DEFAULT_DOWNLOAD_NAME,
    }
}
