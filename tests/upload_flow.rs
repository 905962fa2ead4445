use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use url::Url;

use planilha_uploader::app::{SelectedFile, UploadState};
use planilha_uploader::response::{HandlerOutcome, ResponseHandler};
use planilha_uploader::upload::{
    CleanOptions, ServerReply, UploadController, UploadError, UploadEvent, UploadRequest,
    DEFAULT_CARACTERES, XLSX_MIME,
};

const CLEANED_BYTES: &[u8] = b"planilha processada";
const ATTACHMENT_DISPOSITION: &str = "attachment; filename=\"relatorio_limpo.xlsx\"";

#[derive(Debug, Default)]
struct ReceivedUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    file_bytes: Vec<u8>,
    text_fields: Vec<(String, String)>,
}

#[derive(Clone)]
enum CannedReply {
    Attachment,
    Body(&'static str),
    Status(StatusCode),
}

#[derive(Clone)]
struct ServerState {
    reply: CannedReply,
    tx: Arc<Mutex<Option<oneshot::Sender<ReceivedUpload>>>>,
}

async fn handle_upload(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut received = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            received.file_name = field.file_name().map(str::to_owned);
            received.content_type = field.content_type().map(str::to_owned);
            received.file_bytes = field.bytes().await.expect("file bytes").to_vec();
        } else {
            let value = field.text().await.expect("text field");
            received.text_fields.push((name, value));
        }
    }

    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(received);
    }

    match &state.reply {
        CannedReply::Attachment => (
            [(header::CONTENT_DISPOSITION, ATTACHMENT_DISPOSITION)],
            CLEANED_BYTES.to_vec(),
        )
            .into_response(),
        CannedReply::Body(body) => body.as_bytes().to_vec().into_response(),
        CannedReply::Status(code) => (*code).into_response(),
    }
}

async fn spawn_clean_server(reply: CannedReply) -> (Url, oneshot::Receiver<ReceivedUpload>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        reply,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().route("/", post(handle_upload)).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (
        Url::parse(&format!("http://{addr}/")).expect("endpoint url"),
        rx,
    )
}

fn write_scratch_file(dir: &tempfile::TempDir, len: usize) -> (PathBuf, Vec<u8>) {
    let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let path = dir.path().join("planilha.xlsx");
    std::fs::write(&path, &payload).expect("scratch file");
    (path, payload)
}

fn run_upload(endpoint: Url, path: PathBuf, options: CleanOptions) -> Receiver<UploadEvent> {
    let controller = UploadController::new(endpoint);
    let (tx, rx) = channel();
    controller.start(
        UploadRequest {
            file_path: path,
            file_name: "planilha.xlsx".to_string(),
            options,
        },
        tx,
    );
    rx
}

fn wait_for_completion(
    rx: &Receiver<UploadEvent>,
) -> (Vec<(u64, u64)>, Result<ServerReply, UploadError>) {
    let mut progress = Vec::new();
    loop {
        match rx
            .recv_timeout(Duration::from_secs(10))
            .expect("upload event")
        {
            UploadEvent::Progress { sent, total } => progress.push((sent, total)),
            UploadEvent::Completed(result) => return (progress, result),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_posts_the_form_and_streams_progress() {
    let (endpoint, payload_rx) = spawn_clean_server(CannedReply::Attachment).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, payload) = write_scratch_file(&dir, 150_000);
    let total = payload.len() as u64;

    let events = run_upload(endpoint, path, CleanOptions::default());
    let (progress, result) = wait_for_completion(&events);
    let reply = result.expect("status 200 completes the session");

    let received = payload_rx.await.expect("server captured the upload");
    assert_eq!(received.file_name.as_deref(), Some("planilha.xlsx"));
    assert_eq!(received.content_type.as_deref(), Some(XLSX_MIME));
    assert_eq!(received.file_bytes, payload);
    assert!(received
        .text_fields
        .contains(&("caracteres".to_string(), DEFAULT_CARACTERES.to_string())));
    assert!(received
        .text_fields
        .contains(&("minusculo".to_string(), "on".to_string())));
    assert!(received
        .text_fields
        .contains(&("remover_especiais".to_string(), "on".to_string())));

    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert!(progress.iter().all(|(_, reported)| *reported == total));
    assert_eq!(progress.last(), Some(&(total, total)));

    assert_eq!(
        reply.content_disposition.as_deref(),
        Some(ATTACHMENT_DISPOSITION)
    );
    assert_eq!(reply.body, CLEANED_BYTES);

    let mut state = UploadState::default();
    state.select(SelectedFile {
        path: PathBuf::from("planilha.xlsx"),
        name: "planilha.xlsx".to_string(),
        size: total,
    });
    state.begin().expect("idle state accepts the submission");
    for (sent, reported) in &progress {
        state.record_progress(*sent, *reported);
    }
    assert_eq!(state.percent(), 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn unchecked_options_travel_as_absent_fields() {
    let (endpoint, payload_rx) = spawn_clean_server(CannedReply::Status(StatusCode::OK)).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, _) = write_scratch_file(&dir, 2_000);

    let options = CleanOptions {
        minusculo: false,
        remover_especiais: false,
        caracteres: "[#]".to_string(),
    };
    let events = run_upload(endpoint, path, options);
    let (_, result) = wait_for_completion(&events);
    result.expect("bare 200 still completes");

    let received = payload_rx.await.expect("server captured the upload");
    let names: Vec<&str> = received
        .text_fields
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["caracteres"]);
    assert!(received
        .text_fields
        .contains(&("caracteres".to_string(), "[#]".to_string())));
}

#[tokio::test(flavor = "multi_thread")]
async fn download_handler_saves_the_cleaned_attachment() {
    let (endpoint, _payload_rx) = spawn_clean_server(CannedReply::Attachment).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, _) = write_scratch_file(&dir, 2_000);

    let events = run_upload(endpoint, path, CleanOptions::default());
    let (_, result) = wait_for_completion(&events);
    let reply = result.expect("status 200");

    let downloads = tempfile::tempdir().expect("tempdir");
    let handler = ResponseHandler::Download {
        dir: downloads.path().to_path_buf(),
    };
    let saved = downloads.path().join("relatorio_limpo.xlsx");
    assert_eq!(
        handler.handle(&reply).expect("saved"),
        HandlerOutcome::Saved(saved.clone())
    );
    assert_eq!(std::fs::read(&saved).expect("written file"), CLEANED_BYTES);
}

#[tokio::test(flavor = "multi_thread")]
async fn table_handler_renders_rows_from_the_json_reply() {
    let (endpoint, _payload_rx) = spawn_clean_server(CannedReply::Body(
        r#"{"data":[{"Nota":"A1","Frete":12.5},{}]}"#,
    ))
    .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, _) = write_scratch_file(&dir, 2_000);

    let events = run_upload(endpoint, path, CleanOptions::default());
    let (_, result) = wait_for_completion(&events);
    let reply = result.expect("status 200");

    let outcome = ResponseHandler::TableRender.handle(&reply).expect("rows");
    let HandlerOutcome::Rows(rows) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].nota, "A1");
    assert_eq!(rows[0].frete, "12.5");
    assert_eq!(rows[1].nota, "N/A");
    assert_eq!(rows[1].transportadora, "Nenhuma cotação");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_200_statuses_fail_the_session() {
    for status in [StatusCode::CREATED, StatusCode::INTERNAL_SERVER_ERROR] {
        let (endpoint, _payload_rx) = spawn_clean_server(CannedReply::Status(status)).await;
        let dir = tempfile::tempdir().expect("tempdir");
        let (path, _) = write_scratch_file(&dir, 1_000);

        let events = run_upload(endpoint, path, CleanOptions::default());
        let (_, result) = wait_for_completion(&events);
        match result {
            Err(UploadError::Status(code)) => assert_eq!(code.as_u16(), status.as_u16()),
            other => panic!("expected a status error, got {other:?}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dead_endpoints_fail_the_session() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let endpoint = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("endpoint url");

    let dir = tempfile::tempdir().expect("tempdir");
    let (path, _) = write_scratch_file(&dir, 1_000);

    let events = run_upload(endpoint, path, CleanOptions::default());
    let (_, result) = wait_for_completion(&events);
    match result {
        Err(UploadError::Http(_)) => {}
        other => panic!("expected a transport error, got {other:?}"),
    }
}
