mod download;
mod redirect;
mod table;

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::config::{AppConfig, DeploymentMode};
use crate::upload::ServerReply;

pub use download::DEFAULT_DOWNLOAD_NAME;
pub use table::DisplayRow;

/// What a deployment does with a successful reply. Exactly one variant is
/// active per installation, chosen by configuration rather than at runtime.
#[derive(Debug, Clone)]
pub enum ResponseHandler {
    Download { dir: PathBuf },
    TableRender,
    RedirectOnSuccess { root: Url },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Saved(PathBuf),
    Rows(Vec<DisplayRow>),
    Opened(Url),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("could not save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid table payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not open browser: {0}")]
    Browser(std::io::Error),
}

impl ResponseHandler {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.mode {
            DeploymentMode::Download => Self::Download {
                dir: config.download_dir.clone(),
            },
            DeploymentMode::Table => Self::TableRender,
            DeploymentMode::Redirect => Self::RedirectOnSuccess {
                root: redirect::service_root(&config.endpoint),
            },
        }
    }

    pub fn handle(&self, reply: &ServerReply) -> Result<HandlerOutcome, HandlerError> {
        match self {
            Self::Download { dir } => download::save_attachment(dir, reply).map(HandlerOutcome::Saved),
            Self::TableRender => table::parse_rows(&reply.body).map(HandlerOutcome::Rows),
            Self::RedirectOnSuccess { root } => {
                redirect::open_in_browser(root)?;
                Ok(HandlerOutcome::Opened(root.clone()))
            }
        }
    }
}
