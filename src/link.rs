//! Connection bookkeeping for the live log stream, kept free of browser types
//! so the reconnect and completion rules can be exercised directly.

use crate::config::NORMAL_CLOSURE;
use crate::model::LogMessage;
use crate::state::ConnectionStatus;

/// Follow-up the session must perform after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Nothing,
    /// Close the socket with [`NORMAL_CLOSURE`].
    CloseNormally,
    /// Open a new socket after the configured delay.
    Reconnect,
}

#[derive(Clone, Debug)]
pub struct LinkState {
    status: ConnectionStatus,
    completed: bool,
    closed_for_good: bool,
}

impl Default for LinkState {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            completed: false,
            closed_for_good: false,
        }
    }
}

impl LinkState {
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The status poll only runs while the live stream is down.
    pub fn should_poll(&self) -> bool {
        !self.is_connected() && !self.completed && !self.closed_for_good
    }

    pub fn on_open(&mut self) -> ConnectionStatus {
        if !self.completed {
            self.status = ConnectionStatus::Connected;
        }
        self.status
    }

    pub fn on_message(&mut self, msg: &LogMessage) -> Directive {
        if msg.is_completion() && !self.completed {
            self.mark_completed();
            return Directive::CloseNormally;
        }
        Directive::Nothing
    }

    pub fn on_error(&mut self) -> ConnectionStatus {
        if !self.completed {
            self.status = ConnectionStatus::Error;
        }
        self.status
    }

    pub fn on_close(&mut self, code: u16) -> Directive {
        if !self.completed {
            self.status = ConnectionStatus::Disconnected;
        }
        if code == NORMAL_CLOSURE || self.completed || self.closed_for_good {
            Directive::Nothing
        } else {
            Directive::Reconnect
        }
    }

    /// Completion reported by the status poll.
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.status = ConnectionStatus::Completed;
    }

    /// Teardown: nothing reconnects afterwards.
    pub fn shut_down(&mut self) {
        self.closed_for_good = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed_for_good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogLevel, Timestamp};

    fn event(level: LogLevel, progress: Option<u8>) -> LogMessage {
        LogMessage {
            level,
            message: "m".into(),
            timestamp: Timestamp::Millis(0),
            progress,
            step: None,
            current_step: None,
            total_steps: None,
        }
    }

    #[test]
    fn completion_requests_normal_close_exactly_once() {
        let mut link = LinkState::default();
        link.on_open();
        let done = event(LogLevel::Success, Some(100));

        assert_eq!(link.on_message(&done), Directive::CloseNormally);
        assert_eq!(link.status(), ConnectionStatus::Completed);
        assert_eq!(link.on_message(&done), Directive::Nothing);
        assert_eq!(link.on_close(NORMAL_CLOSURE), Directive::Nothing);
        assert_eq!(link.status(), ConnectionStatus::Completed);
    }

    #[test]
    fn success_below_hundred_is_not_completion() {
        let mut link = LinkState::default();
        assert_eq!(link.on_message(&event(LogLevel::Success, Some(99))), Directive::Nothing);
        assert_eq!(link.on_message(&event(LogLevel::Info, Some(100))), Directive::Nothing);
        assert!(!link.is_completed());
    }

    #[test]
    fn only_abnormal_close_reconnects() {
        let mut link = LinkState::default();
        link.on_open();
        assert_eq!(link.on_close(NORMAL_CLOSURE), Directive::Nothing);
        assert_eq!(link.status(), ConnectionStatus::Disconnected);

        for code in [1001, 1006, 1011, 4000] {
            link.on_open();
            assert_eq!(link.on_close(code), Directive::Reconnect, "code {code}");
        }
    }

    #[test]
    fn error_then_close_still_reconnects() {
        let mut link = LinkState::default();
        assert_eq!(link.on_error(), ConnectionStatus::Error);
        assert_eq!(link.on_close(1006), Directive::Reconnect);
    }

    #[test]
    fn polling_suppressed_while_connected() {
        let mut link = LinkState::default();
        assert!(link.should_poll());
        link.on_open();
        assert!(!link.should_poll());
        link.on_close(1006);
        assert!(link.should_poll());
        link.mark_completed();
        assert!(!link.should_poll());
    }

    #[test]
    fn shut_down_link_never_reconnects() {
        let mut link = LinkState::default();
        link.on_open();
        link.shut_down();
        assert_eq!(link.on_close(1006), Directive::Nothing);
        assert!(!link.should_poll());
    }
}
