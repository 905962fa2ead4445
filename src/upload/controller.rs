use std::sync::mpsc::Sender;
use std::thread;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Body, Client, StatusCode};
use tokio::runtime::Runtime;
use url::Url;

use crate::upload::progress;
use crate::upload::types::{ServerReply, UploadError, UploadEvent, UploadRequest, XLSX_MIME};

pub struct UploadController {
    endpoint: Url,
}

impl UploadController {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    /// Posts the request from a worker thread. Progress events stream over
    /// the channel while the body is in flight, and exactly one `Completed`
    /// event ends the session. The app gates the submit control, so at most
    /// one worker runs at a time.
    pub fn start(&self, request: UploadRequest, events: Sender<UploadEvent>) {
        let endpoint = self.endpoint.clone();

        thread::spawn(move || {
            let result = Runtime::new()
                .map_err(UploadError::from)
                .and_then(|rt| rt.block_on(send_upload(endpoint, request, &events)));
            let _ = events.send(UploadEvent::Completed(result));
        });
    }
}

async fn send_upload(
    endpoint: Url,
    request: UploadRequest,
    events: &Sender<UploadEvent>,
) -> Result<ServerReply, UploadError> {
    let UploadRequest {
        file_path,
        file_name,
        options,
    } = request;

    let bytes = tokio::fs::read(&file_path).await?;
    let total = bytes.len() as u64;

    let file = Part::stream_with_length(
        Body::wrap_stream(progress::chunked(bytes, events.clone())),
        total,
    )
    .file_name(file_name)
    .mime_str(XLSX_MIME)?;

    let mut form = Form::new()
        .part("file", file)
        .text("caracteres", options.caracteres);
    if options.minusculo {
        form = form.text("minusculo", "on");
    }
    if options.remover_especiais {
        form = form.text("remover_especiais", "on");
    }

    log::debug!("posting multipart upload to {endpoint}");
    let response = Client::new().post(endpoint).multipart(form).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(UploadError::Status(status));
    }

    let content_disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await?.to_vec();

    Ok(ServerReply {
        content_disposition,
        body,
    })
}
