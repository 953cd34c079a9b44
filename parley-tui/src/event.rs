use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::time::{Interval, MissedTickBehavior};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize(u16, u16),
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit,
    InsertNewline,
    InsertChar(char),
    Backspace,
    ClearInput,
    ToggleTheme,
    ScrollUp,
    ScrollDown,
    ScrollToBottom,
    Quit,
}

/// Composer keyboard contract: Enter submits, Shift+Enter inserts a newline.
///
/// Many terminals only report Shift on Enter once keyboard enhancement is
/// enabled, so Alt+Enter and Ctrl+J insert a newline as well.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Enter if shift || alt => Some(Action::InsertNewline),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Char('j') if ctrl => Some(Action::InsertNewline),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('t') if ctrl => Some(Action::ToggleTheme),
        KeyCode::Char('u') if ctrl => Some(Action::ClearInput),
        KeyCode::Char(c) if !ctrl && !alt => Some(Action::InsertChar(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        KeyCode::End => Some(Action::ScrollToBottom),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

pub struct EventReader {
    stream: EventStream,
    ticker: Interval,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let mut ticker = tokio::time::interval(tick_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            ticker,
        }
    }

    /// Next tick or terminal event. Events the app has no use for (mouse,
    /// focus) are skipped so they do not advance the animation.
    pub async fn next(&mut self) -> std::io::Result<AppEvent> {
        loop {
            tokio::select! {
                _ = self.ticker.tick() => return Ok(AppEvent::Tick),
                maybe_event = self.stream.next() => {
                    if let Some(event) = translate(maybe_event)? {
                        return Ok(event);
                    }
                }
            }
        }
    }
}

fn translate(maybe_event: Option<std::io::Result<Event>>) -> std::io::Result<Option<AppEvent>> {
    match maybe_event {
        Some(Ok(Event::Key(key))) => Ok(Some(AppEvent::Key(key))),
        Some(Ok(Event::Paste(text))) => Ok(Some(AppEvent::Paste(text))),
        Some(Ok(Event::Resize(width, height))) => Ok(Some(AppEvent::Resize(width, height))),
        Some(Ok(_)) => Ok(None),
        Some(Err(e)) => Err(e),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "terminal event stream closed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_event_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_enter_submits() {
        assert_eq!(map_key(key_event(KeyCode::Enter)), Some(Action::Submit));
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        assert_eq!(
            map_key(key_event_with(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(Action::InsertNewline)
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Enter, KeyModifiers::ALT)),
            Some(Action::InsertNewline)
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(Action::InsertNewline)
        );
    }

    #[test]
    fn test_typing() {
        assert_eq!(
            map_key(key_event(KeyCode::Char('q'))),
            Some(Action::InsertChar('q'))
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Action::InsertChar('Q'))
        );
        assert_eq!(map_key(key_event(KeyCode::Backspace)), Some(Action::Backspace));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            Some(Action::ToggleTheme)
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::ClearInput)
        );
        assert_eq!(
            map_key(key_event_with(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(map_key(key_event(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn test_scrolling() {
        assert_eq!(map_key(key_event(KeyCode::PageUp)), Some(Action::ScrollUp));
        assert_eq!(map_key(key_event(KeyCode::PageDown)), Some(Action::ScrollDown));
        assert_eq!(map_key(key_event(KeyCode::End)), Some(Action::ScrollToBottom));
    }

    #[test]
    fn test_unused_terminal_events_skipped() {
        assert_eq!(translate(Some(Ok(Event::FocusGained))).unwrap(), None);
        assert_eq!(translate(Some(Ok(Event::FocusLost))).unwrap(), None);
        assert_eq!(
            translate(Some(Ok(Event::Key(key_event(KeyCode::Enter))))).unwrap(),
            Some(AppEvent::Key(key_event(KeyCode::Enter)))
        );
        assert_eq!(
            translate(Some(Ok(Event::Resize(80, 24)))).unwrap(),
            Some(AppEvent::Resize(80, 24))
        );
        assert!(translate(None).is_err());
    }

    #[test]
    fn test_release_events_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }
}
