//! User notifications (desktop popups)

use anyhow::Result;

pub const APP_NAME: &str = "pocketkit";

pub trait Notifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()>;
}

/// Sends freedesktop/macOS notifications through notify-rust
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(summary)
            .body(body)
            .icon("dialog-password")
            .show()?;
        Ok(())
    }
}
