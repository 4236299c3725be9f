//! Widget UI state: open, maximized, and the "new message" nudge.
//!
//! Owned by the widget, not the session: closing the panel leaves any
//! in-flight reply streaming in the background.

use std::time::Duration;

use crate::types::SessionStatus;

/// Delay before the nudge first appears.
pub const NOTIFICATION_INITIAL_DELAY: Duration = Duration::from_secs(2);
/// How long the nudge stays up each cycle.
pub const NOTIFICATION_VISIBLE_FOR: Duration = Duration::from_secs(5);
/// Gap between nudges.
pub const NOTIFICATION_HIDDEN_FOR: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    pub open: bool,
    pub maximized: bool,
    pub show_notification: bool,
    pub notification_dismissed: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self { open: false, maximized: false, show_notification: true, notification_dismissed: false }
    }
}

impl WidgetState {
    /// Launcher button: open or close the panel.
    pub fn toggle(&mut self) {
        let was_open = self.open;
        self.open = !self.open;
        self.show_notification = false;
        if !was_open {
            self.notification_dismissed = false;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
    }

    pub fn dismiss_notification(&mut self) {
        self.notification_dismissed = true;
        self.show_notification = false;
    }

    /// Whether the nudge is up `elapsed` after the panel was last closed.
    ///
    /// Hidden for the initial delay, then alternates visible / hidden.
    #[must_use]
    pub fn notification_visible(&self, elapsed: Duration) -> bool {
        if self.open || self.notification_dismissed {
            return false;
        }
        let Some(into_cycle) = elapsed.checked_sub(NOTIFICATION_INITIAL_DELAY) else {
            return false;
        };
        let period = NOTIFICATION_VISIBLE_FOR + NOTIFICATION_HIDDEN_FOR;
        let phase = into_cycle.as_millis() % period.as_millis();
        phase < NOTIFICATION_VISIBLE_FOR.as_millis()
    }

    /// Advance `show_notification` to match the cycle at `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        self.show_notification = self.notification_visible(elapsed);
    }
}

/// Send button enablement: non-blank input and no request in flight.
#[must_use]
pub fn can_send(input: &str, status: &SessionStatus) -> bool {
    !input.trim().is_empty() && !status.is_busy()
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
