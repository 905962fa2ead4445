mod state;
mod ui;

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use eframe::{egui, App};

use crate::config::{AppConfig, DeploymentMode};
use crate::response::{HandlerOutcome, ResponseHandler};
use crate::upload::{
    CleanOptions, ServerReply, UploadController, UploadError, UploadEvent, UploadRequest,
};
use crate::utils::file_size;

pub use state::{
    SelectedFile, SessionStatus, UploadPhase, UploadSession, UploadState, FILE_PLACEHOLDER,
    RESET_DELAY,
};

/// Shown verbatim for every failed submission, whatever went wrong.
pub const UPLOAD_ERROR_MESSAGE: &str = "Ocorreu um erro ao processar o arquivo.";

pub struct UploaderApp {
    config: AppConfig,
    controller: UploadController,
    handler: ResponseHandler,
    state: UploadState,
    options: CleanOptions,
    events: Option<Receiver<UploadEvent>>,
}

impl UploaderApp {
    pub fn new(config: AppConfig) -> Self {
        log::info!(
            "starting in {:?} mode against {}",
            config.mode,
            config.endpoint
        );
        Self {
            controller: UploadController::new(config.endpoint.clone()),
            handler: ResponseHandler::from_config(&config),
            state: UploadState::default(),
            options: CleanOptions::default(),
            events: None,
            config,
        }
    }

    pub fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Planilha Excel", &["xlsx"])
            .pick_file()
        {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            self.state.select(SelectedFile { path, name, size });
        }
    }

    pub fn submit(&mut self) {
        let Some(file) = self.state.begin() else {
            return;
        };
        log::info!(
            "uploading {} ({})",
            file.name,
            file_size::format_size(file.size)
        );

        let (sender, receiver) = mpsc::channel();
        self.events = Some(receiver);
        self.controller.start(
            UploadRequest {
                file_path: file.path,
                file_name: file.name,
                options: self.options.clone(),
            },
            sender,
        );
    }

    fn drain_events(&mut self) {
        let Some(receiver) = &self.events else {
            return;
        };

        let mut terminal = None;
        while let Ok(event) = receiver.try_recv() {
            match event {
                UploadEvent::Progress { sent, total } => self.state.record_progress(sent, total),
                UploadEvent::Completed(result) => terminal = Some(result),
            }
        }

        if let Some(result) = terminal {
            self.events = None;
            self.finish(result);
        }
    }

    /// Ends the session: applies the reply through the configured handler,
    /// raises the fixed alert on any failure and schedules the reset. The
    /// countdown starts once the alert is dismissed.
    fn finish(&mut self, result: Result<ServerReply, UploadError>) {
        let applied = match result {
            Ok(reply) => self.apply_reply(&reply),
            Err(err) => {
                log::error!("upload failed: {err}");
                false
            }
        };

        self.state.complete(applied);
        if !applied {
            show_error_alert();
        }
        self.state.schedule_reset(Instant::now());
    }

    fn apply_reply(&mut self, reply: &ServerReply) -> bool {
        match self.handler.handle(reply) {
            Ok(HandlerOutcome::Saved(path)) => {
                log::info!("saved cleaned spreadsheet to {}", path.display());
                self.state.last_saved = Some(path);
                true
            }
            Ok(HandlerOutcome::Rows(rows)) => {
                log::info!("rendering {} result rows", rows.len());
                self.state.rows = rows;
                true
            }
            Ok(HandlerOutcome::Opened(url)) => {
                log::info!("opened {url} in the browser");
                true
            }
            Err(err) => {
                log::error!("could not apply the server reply: {err}");
                false
            }
        }
    }
}

impl App for UploaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        let now = Instant::now();
        let clear_selection = self.config.mode == DeploymentMode::Download;
        if !self.state.poll_reset(now, clear_selection) {
            if let Some(due) = self.state.reset_due() {
                ctx.request_repaint_after(due.saturating_duration_since(now));
            }
        }

        self.render(ctx);

        // Worker events arrive over a channel, so keep repainting while
        // a transfer is in flight.
        if matches!(self.state.phase, UploadPhase::Uploading) {
            ctx.request_repaint();
        }
    }
}

fn show_error_alert() {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Erro")
        .set_description(UPLOAD_ERROR_MESSAGE)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
