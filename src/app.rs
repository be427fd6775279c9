use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::adder::{AdderState, Operand};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::AppConfig;
use crate::notify::{DesktopNotifier, Notifier};
use crate::password::PasswordState;

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Adder,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    // Adder widget (top box)
    pub adder: AdderState,
    pub adder_focus: Operand,

    // Password widget (bottom box)
    pub password: PasswordState,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    clipboard: Box<dyn ClipboardSink>,
    notifier: Box<dyn Notifier>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_sinks(
            config,
            Box::new(SystemClipboard::new()),
            Box::new(DesktopNotifier::new(config.notifications)),
        )
    }

    pub fn with_sinks(
        config: &AppConfig,
        clipboard: Box<dyn ClipboardSink>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            section: Section::Adder,
            popup: Popup::None,

            adder: AdderState::new(),
            adder_focus: Operand::First,

            password: PasswordState::new(config.password.to_options()),

            status_message: None,
            status_message_time: None,

            clipboard,
            notifier,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// True while keystrokes are typed into an adder field
    pub fn is_editing(&self) -> bool {
        self.popup == Popup::None && self.section == Section::Adder
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match key.code {
            // Navigation between sections (Adder ↔ Password)
            KeyCode::Tab | KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Adder => Section::Password,
                    Section::Password => Section::Adder,
                };
                Ok(())
            }
            KeyCode::F(1) => {
                self.popup = Popup::Help;
                Ok(())
            }
            _ => match self.section {
                Section::Adder => self.handle_adder_key(key),
                Section::Password => self.handle_password_key(key),
            },
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q') | KeyCode::F(1)
        ) {
            self.popup = Popup::None;
        }
        Ok(())
    }

    fn handle_adder_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Down => self.adder_focus = self.adder_focus.other(),
            KeyCode::Enter => {
                let sum = self.adder.add();
                tracing::debug!("Adder sum: {}", sum);
            }
            KeyCode::Esc => {
                self.adder.clear();
                self.adder_focus = Operand::First;
            }
            KeyCode::Backspace => self.adder.pop_char(self.adder_focus),
            // Text is stored verbatim; coercion happens on add
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.adder.push_char(self.adder_focus, c);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_password_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Length slider
            KeyCode::Left | KeyCode::Char('-') => self.password.decrease_length(),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.password.increase_length(),

            // Character classes
            KeyCode::Char('n') => self.password.toggle_digits(),
            KeyCode::Char('c') => self.password.toggle_letters(),
            KeyCode::Char('s') => self.password.toggle_symbols(),

            KeyCode::Char('g') | KeyCode::Char(' ') => self.password.generate(),
            KeyCode::Char('y') | KeyCode::Enter => self.copy_password()?,

            // Help (? or h)
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    /// Copy the password; the status line acknowledges the request up front
    fn copy_password(&mut self) -> Result<()> {
        self.set_status("Password copied!");
        self.password
            .copy_to_clipboard(self.clipboard.as_mut(), self.notifier.as_ref())
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if now.saturating_duration_since(time) >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::password::{DIGITS, MIN_LENGTH};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Clipboard double whose contents stay visible after it is boxed
    struct SharedClipboard {
        contents: Rc<RefCell<Option<String>>>,
        fail: bool,
    }

    impl ClipboardSink for SharedClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    struct SharedNotifier {
        count: Rc<RefCell<usize>>,
    }

    impl Notifier for SharedNotifier {
        fn notify(&self, _summary: &str, _body: &str) -> Result<()> {
            *self.count.borrow_mut() += 1;
            Ok(())
        }
    }

    struct Harness {
        app: App,
        clipboard: Rc<RefCell<Option<String>>>,
        notifications: Rc<RefCell<usize>>,
    }

    fn harness(fail_clipboard: bool) -> Harness {
        let clipboard = Rc::new(RefCell::new(None));
        let notifications = Rc::new(RefCell::new(0));
        let app = App::with_sinks(
            &AppConfig::default(),
            Box::new(SharedClipboard { contents: clipboard.clone(), fail: fail_clipboard }),
            Box::new(SharedNotifier { count: notifications.clone() }),
        );
        Harness { app, clipboard, notifications }
    }

    fn press(app: &mut App, code: KeyCode) -> Result<()> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).unwrap();
        }
    }

    #[test]
    fn test_adder_typing_and_add() {
        let mut h = harness(false);
        assert!(h.app.is_editing());

        type_text(&mut h.app, "3");
        press(&mut h.app, KeyCode::Down).unwrap();
        type_text(&mut h.app, "4");
        assert_eq!(h.app.adder.sum(), None);

        press(&mut h.app, KeyCode::Enter).unwrap();
        assert_eq!(h.app.adder.sum(), Some(7.0));
    }

    #[test]
    fn test_adder_accepts_any_text() {
        let mut h = harness(false);
        type_text(&mut h.app, "3");
        press(&mut h.app, KeyCode::Down).unwrap();
        type_text(&mut h.app, "abc");
        press(&mut h.app, KeyCode::Enter).unwrap();

        assert!(h.app.adder.sum().unwrap().is_nan());
        assert!(h.app.status_message.is_none(), "NaN is not an error");
    }

    #[test]
    fn test_adder_backspace_and_clear() {
        let mut h = harness(false);
        type_text(&mut h.app, "12");
        press(&mut h.app, KeyCode::Backspace).unwrap();
        assert_eq!(h.app.adder.operand(Operand::First), "1");

        press(&mut h.app, KeyCode::Enter).unwrap();
        press(&mut h.app, KeyCode::Esc).unwrap();
        assert_eq!(h.app.adder.operand(Operand::First), "");
        assert_eq!(h.app.adder.sum(), None);
    }

    #[test]
    fn test_tab_switches_section() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Tab).unwrap();
        assert_eq!(h.app.section, Section::Password);
        assert!(!h.app.is_editing());

        press(&mut h.app, KeyCode::BackTab).unwrap();
        assert_eq!(h.app.section, Section::Adder);
    }

    #[test]
    fn test_password_keys_regenerate() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Tab).unwrap();

        press(&mut h.app, KeyCode::Char('c')).unwrap();
        press(&mut h.app, KeyCode::Char('n')).unwrap();
        for _ in 0..20 {
            press(&mut h.app, KeyCode::Left).unwrap();
        }

        assert_eq!(h.app.password.length(), MIN_LENGTH);
        assert_eq!(h.app.password.password().len(), MIN_LENGTH);
        assert!(h.app.password.password().chars().all(|c| DIGITS.contains(c)));

        press(&mut h.app, KeyCode::Right).unwrap();
        assert_eq!(h.app.password.password().len(), MIN_LENGTH + 1);
    }

    #[test]
    fn test_copy_sets_clipboard_and_notifies() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::Tab).unwrap();
        press(&mut h.app, KeyCode::Char('y')).unwrap();

        assert_eq!(h.clipboard.borrow().as_deref(), Some(h.app.password.password()));
        assert_eq!(*h.notifications.borrow(), 1);
        assert_eq!(h.app.status_message.as_deref(), Some("Password copied!"));
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let mut h = harness(true);
        press(&mut h.app, KeyCode::Tab).unwrap();

        let result = press(&mut h.app, KeyCode::Enter);
        assert!(result.is_err());
        assert_eq!(*h.notifications.borrow(), 1, "Notification fires regardless");
        assert!(h.clipboard.borrow().is_none());
    }

    #[test]
    fn test_help_popup() {
        let mut h = harness(false);
        press(&mut h.app, KeyCode::F(1)).unwrap();
        assert_eq!(h.app.popup, Popup::Help);
        assert!(!h.app.is_editing());

        // Keys go to the popup, not the adder
        type_text(&mut h.app, "x");
        assert_eq!(h.app.adder.operand(Operand::First), "");

        press(&mut h.app, KeyCode::Esc).unwrap();
        assert_eq!(h.app.popup, Popup::None);
    }

    #[test]
    fn test_status_message_expires() {
        let mut h = harness(false);
        h.app.set_status("hello");
        h.app.tick();
        assert!(h.app.status_message.is_some());

        let shown_at = h.app.status_message_time.unwrap();
        h.app.tick_at(shown_at + STATUS_TIMEOUT - Duration::from_millis(1));
        assert!(h.app.status_message.is_some());

        h.app.tick_at(shown_at + STATUS_TIMEOUT);
        assert!(h.app.status_message.is_none());
        assert!(h.app.status_message_time.is_none());
    }
}
