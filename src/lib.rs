pub mod app;
pub mod config;
pub mod response;
pub mod upload;
pub mod utils;

pub use app::UploaderApp;
pub use config::{AppConfig, DeploymentMode, Settings};
pub use response::{DisplayRow, HandlerOutcome, ResponseHandler};
pub use upload::{UploadController, UploadEvent, UploadRequest};
