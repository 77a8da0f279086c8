use super::config::UserConfig;
use super::keys::KeyConfig;
use crate::lyrics::FetchTicket;
use crate::remote::ServerEvent;
use crate::session::{LyricsRequest, Session, SessionError};
use crate::theme::Theme;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// View mode for the right panel 🎛️
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Lyrics,
    Queue,
}

/// Which list the queue cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueSection {
    Previous,
    #[default]
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

pub struct App {
    pub is_running: bool,
    pub theme: Theme,
    pub keys: KeyConfig,
    pub session: Session,
    pub view_mode: ViewMode,
    pub connection: ConnectionStatus,
    pub queue_id: String,

    // Queue view
    pub queue_section: QueueSection,
    pub queue_selected: usize,
    pub show_previous: bool,

    // Overlays
    pub show_keyhints: bool,
    pub toast: Option<Toast>,

    /// Where the progress bar was last drawn, for mouse seeking.
    pub progress_bar: Rect,
    pub seek_step_ms: i64,
}

impl App {
    pub fn new(config: &UserConfig, queue_id: &str, theme: Theme, session: Session) -> Self {
        Self {
            is_running: true,
            theme,
            keys: config.keys.clone(),
            session,
            view_mode: ViewMode::default(),
            connection: ConnectionStatus::Connecting,
            queue_id: queue_id.to_string(),
            queue_section: QueueSection::default(),
            queue_selected: 0,
            show_previous: false,
            show_keyhints: false,
            toast: None,
            progress_bar: Rect::default(),
            seek_step_ms: config.seek_step_ms(),
        }
    }

    /// Forward a server event to the session and keep the view consistent
    /// with whatever the queue now looks like.
    pub fn handle_server_event(&mut self, event: ServerEvent) -> Option<LyricsRequest> {
        if let ServerEvent::Error(err) = &event {
            self.show_toast(&format!("⚠ {}", err.message));
        }
        let request = self.session.handle_event(event);
        self.clamp_queue_cursor();
        request
    }

    pub fn handle_lyrics(
        &mut self,
        ticket: FetchTicket,
        result: Result<crate::lyrics::LyricsTimeline, crate::lyrics::LyricsError>,
    ) {
        self.session.accept_lyrics(&ticket, result);
    }

    /// The socket task has ended; freeze what is on screen.
    pub fn handle_disconnect(&mut self, reason: String) {
        tracing::debug!("tick lease released after disconnect");
        self.session.on_disconnect();
        self.show_toast("✗ Disconnected");
        self.connection = ConnectionStatus::Disconnected(reason);
    }

    /// Show `ok` on success, the error otherwise.
    pub fn report<T>(&mut self, result: Result<T, SessionError>, ok: &str) {
        match result {
            Ok(_) => self.show_toast(ok),
            Err(e) => {
                tracing::debug!(error = %e, "command refused");
                self.show_toast(&format!("✗ {}", e));
            }
        }
    }

    pub fn show_toast(&mut self, message: &str) {
        let now = Instant::now();
        let deadline = now + Duration::from_millis(2000);

        // Keep start_time on rapid updates so the entrance animation doesn't replay
        if let Some(ref mut current) = self.toast {
            current.message = message.to_string();
            current.deadline = deadline;
        } else {
            self.toast = Some(Toast {
                message: message.to_string(),
                start_time: now,
                deadline,
            });
        }
    }

    /// Called every UI tick.
    pub fn on_tick(&mut self) {
        if let Some(ref toast) = self.toast {
            if Instant::now() > toast.deadline {
                self.toast = None;
            }
        }
    }

    pub fn section_len(&self, section: QueueSection) -> usize {
        let queue = self.session.queue();
        match section {
            QueueSection::Previous => queue.previous().len(),
            QueueSection::Upcoming => queue.upcoming_view().len(),
        }
    }

    pub fn clamp_queue_cursor(&mut self) {
        if !self.show_previous {
            self.queue_section = QueueSection::Upcoming;
        }
        let len = self.section_len(self.queue_section);
        self.queue_selected = self.queue_selected.min(len.saturating_sub(1));
    }
}
