use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::response::DisplayRow;

/// Delay between a terminal event and the form returning to rest.
pub const RESET_DELAY: Duration = Duration::from_millis(2000);

pub const FILE_PLACEHOLDER: &str = "Selecione um arquivo Excel (.xlsx)";

/// Lifecycle of one submission:
/// `Idle -> Uploading -> Done -> Resetting -> Idle`.
/// `Done` is momentary; the app schedules the reset in the same frame the
/// terminal event lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Done,
    Resetting { due: Instant },
}

impl Default for UploadPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct UploadSession {
    pub file_name: String,
    pub percent: u8,
    pub status: SessionStatus,
}

impl UploadSession {
    fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            percent: 0,
            status: SessionStatus::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Default)]
pub struct UploadState {
    pub phase: UploadPhase,
    pub selected: Option<SelectedFile>,
    pub session: Option<UploadSession>,
    pub rows: Vec<DisplayRow>,
    pub last_saved: Option<PathBuf>,
}

impl UploadState {
    pub fn select(&mut self, file: SelectedFile) {
        self.selected = Some(file);
    }

    pub fn file_label(&self) -> &str {
        self.selected
            .as_ref()
            .map(|file| file.name.as_str())
            .unwrap_or(FILE_PLACEHOLDER)
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.phase, UploadPhase::Idle)
    }

    /// Opens a session for the selected file. Refused while a previous
    /// session is still running or resetting, and without a selection.
    pub fn begin(&mut self) -> Option<SelectedFile> {
        if !self.can_submit() {
            return None;
        }
        let file = self.selected.clone()?;
        self.session = Some(UploadSession::new(&file.name));
        self.phase = UploadPhase::Uploading;
        Some(file)
    }

    /// Folds a transfer report into the session percentage. The value is the
    /// rounded sent/total ratio and never moves backwards; an unknown total
    /// (zero) leaves it untouched.
    pub fn record_progress(&mut self, sent: u64, total: u64) {
        if !matches!(self.phase, UploadPhase::Uploading) || total == 0 {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            let percent = ((sent as f64 / total as f64) * 100.0).round().min(100.0) as u8;
            session.percent = session.percent.max(percent);
        }
    }

    /// Marks the running session terminal. Only the first call counts.
    pub fn complete(&mut self, success: bool) {
        if !matches!(self.phase, UploadPhase::Uploading) {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.status = if success {
                SessionStatus::Success
            } else {
                SessionStatus::Error
            };
        }
        self.phase = UploadPhase::Done;
    }

    pub fn schedule_reset(&mut self, now: Instant) {
        if !matches!(self.phase, UploadPhase::Done) {
            return;
        }
        self.phase = UploadPhase::Resetting { due: now + RESET_DELAY };
    }

    pub fn reset_due(&self) -> Option<Instant> {
        match self.phase {
            UploadPhase::Resetting { due } => Some(due),
            _ => None,
        }
    }

    /// Runs the pending reset once its deadline passes: the session is
    /// dropped, the submit gate reopens and, when asked, the selection is
    /// cleared. Rows and the last saved path survive.
    pub fn poll_reset(&mut self, now: Instant, clear_selection: bool) -> bool {
        let UploadPhase::Resetting { due } = self.phase else {
            return false;
        };
        if now < due {
            return false;
        }
        self.session = None;
        self.phase = UploadPhase::Idle;
        if clear_selection {
            self.selected = None;
        }
        true
    }

    pub fn percent(&self) -> u8 {
        self.session.as_ref().map(|s| s.percent).unwrap_or(0)
    }

    pub fn bar_fraction(&self) -> f32 {
        f32::from(self.percent()) / 100.0
    }

    pub fn done_fill(&self) -> bool {
        self.percent() == 100
    }

    pub fn progress_visible(&self) -> bool {
        !matches!(self.phase, UploadPhase::Idle)
    }
}
