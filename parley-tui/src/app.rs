use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, info};

use parley_core::ChatSession;

use crate::event::{map_key, Action, AppEvent, EventReader};
use crate::theme::{Theme, ThemeMode};
use crate::ui;

/// Rows moved per PgUp/PgDn.
const SCROLL_STEP: u16 = 5;

pub struct App {
    pub running: bool,
    pub session: ChatSession,
    pub theme_mode: ThemeMode,
    /// Rows scrolled up from the newest message; 0 follows the conversation.
    pub scroll_offset: u16,
    pub animation_tick: u64,
    pub backend_label: String,
}

impl App {
    pub fn new(session: ChatSession, theme_mode: ThemeMode) -> Self {
        let backend_label = session.backend().describe();
        Self {
            running: true,
            session,
            theme_mode,
            scroll_offset: 0,
            animation_tick: 0,
            backend_label,
        }
    }

    pub fn theme(&self) -> &'static dyn Theme {
        self.theme_mode.theme()
    }

    pub async fn apply(&mut self, action: Action) {
        match action {
            Action::Submit => {
                let ticket = self.session.controller().lock().await.begin_send();
                if let Some(ticket) = ticket {
                    self.scroll_offset = 0;
                    self.session.spawn_dispatch(ticket);
                }
            }
            Action::InsertNewline => self.session.controller().lock().await.push_newline(),
            Action::InsertChar(c) => self.session.controller().lock().await.push_char(c),
            Action::Backspace => self.session.controller().lock().await.backspace(),
            Action::ClearInput => self.session.controller().lock().await.clear_input(),
            Action::ToggleTheme => {
                self.theme_mode = self.theme_mode.toggled();
                debug!(theme = self.theme().name(), "theme toggled");
            }
            Action::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_add(SCROLL_STEP);
            }
            Action::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(SCROLL_STEP);
            }
            Action::ScrollToBottom => self.scroll_offset = 0,
            Action::Quit => self.running = false,
        }
    }

    /// Bracketed paste lands in the composer as-is, with CRLF folded to LF.
    pub async fn paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut controller = self.session.controller().lock().await;
        for c in normalized.chars() {
            if c == '\n' {
                controller.push_newline();
            } else {
                controller.push_char(c);
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.animation_tick = self.animation_tick.wrapping_add(1);
    }

    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key) {
                    self.apply(action).await;
                }
            }
            AppEvent::Paste(text) => self.paste(&text).await,
            AppEvent::Resize(width, height) => debug!(width, height, "terminal resized"),
            AppEvent::Tick => self.on_tick(),
        }
    }

    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventReader,
    ) -> Result<()> {
        info!(backend = %self.backend_label, "chat started");

        while self.running {
            {
                let controller = self.session.controller().lock().await;
                terminal.draw(|frame| ui::render(frame, self, &controller))?;
            }

            let event = events.next().await?;
            self.handle_event(event).await;
        }

        info!("chat closed");
        Ok(())
    }
}
