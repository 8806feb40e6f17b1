//! Render state of a single log viewer.

use std::collections::VecDeque;
use std::rc::Rc;

use yew::Reducible;

use crate::model::{LogLevel, LogMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
    Error,
    Completed,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Error => "Connection error",
            ConnectionStatus::Completed => "Install complete",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Error => "error",
            ConnectionStatus::Completed => "completed",
        }
    }
}

/// A rendered log line. `seq` never repeats within a viewer and keys the DOM node.
#[derive(Clone, Debug, PartialEq)]
pub struct LogLine {
    pub seq: u64,
    pub level: LogLevel,
    pub clock: String,
    pub text: String,
}

/// Bounded FIFO of rendered lines; pushing past capacity evicts the oldest.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
    next_seq: u64,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, msg: &LogMessage) {
        self.lines.push_back(LogLine {
            seq: self.next_seq,
            level: msg.level,
            clock: msg.timestamp.clock_label(),
            text: msg.message.clone(),
        });
        self.next_seq += 1;
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Sequence number of the newest line; changes on every push.
    pub fn last_seq(&self) -> Option<u64> {
        self.lines.back().map(|line| line.seq)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    pub status: ConnectionStatus,
    pub progress: u8,
    pub step: String,
    pub lines: LineBuffer,
}

impl ViewerState {
    pub fn new(max_lines: usize) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            progress: 0,
            step: "Preparing...".to_string(),
            lines: LineBuffer::new(max_lines),
        }
    }

    /// Modifier class for the progress fill.
    pub fn progress_class(&self) -> &'static str {
        match self.progress {
            100 => "completed",
            p if p > 50 => "in-progress",
            _ => "",
        }
    }
}

pub enum ViewerAction {
    Status(ConnectionStatus),
    Message(LogMessage),
    Progress(u8),
    Clear,
}

impl Reducible for ViewerState {
    type Action = ViewerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ViewerAction::Status(status) => next.status = status,
            ViewerAction::Message(msg) => {
                next.lines.push(&msg);
                if let Some(progress) = msg.progress {
                    next.progress = progress;
                }
                if let Some(step) = msg.step_label() {
                    next.step = step;
                }
            }
            ViewerAction::Progress(progress) => next.progress = progress,
            ViewerAction::Clear => next.lines.clear(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    fn msg(text: &str) -> LogMessage {
        LogMessage {
            level: LogLevel::Info,
            message: text.to_string(),
            timestamp: Timestamp::Millis(0),
            progress: None,
            step: None,
            current_step: None,
            total_steps: None,
        }
    }

    #[test]
    fn buffer_never_exceeds_capacity_and_evicts_oldest() {
        let mut buffer = LineBuffer::new(1000);
        for i in 0..2500 {
            buffer.push(&msg(&format!("line {i}")));
            assert!(buffer.len() <= 1000);
        }
        assert_eq!(buffer.len(), 1000);
        let texts: Vec<_> = buffer.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts.first(), Some(&"line 1500"));
        assert_eq!(texts.last(), Some(&"line 2499"));
    }

    #[test]
    fn seq_keeps_growing_after_clear() {
        let mut buffer = LineBuffer::new(3);
        buffer.push(&msg("a"));
        buffer.push(&msg("b"));
        buffer.clear();
        assert!(buffer.is_empty());
        buffer.push(&msg("c"));
        assert_eq!(buffer.iter().next().map(|l| l.seq), Some(2));
    }

    #[test]
    fn message_updates_progress_and_step() {
        let state = Rc::new(ViewerState::new(10));
        let mut m = msg("compiling");
        m.progress = Some(60);
        m.step = Some("build".into());
        m.current_step = Some(3);
        m.total_steps = Some(4);

        let state = state.reduce(ViewerAction::Message(m));
        assert_eq!(state.progress, 60);
        assert_eq!(state.step, "step 3/4: build");
        assert_eq!(state.progress_class(), "in-progress");
        assert_eq!(state.lines.len(), 1);

        let state = state.reduce(ViewerAction::Message(msg("no progress field")));
        assert_eq!(state.progress, 60);
        assert_eq!(state.step, "step 3/4: build");
    }

    #[test]
    fn clear_keeps_progress() {
        let state = Rc::new(ViewerState::new(10))
            .reduce(ViewerAction::Progress(100))
            .reduce(ViewerAction::Message(msg("x")))
            .reduce(ViewerAction::Clear);
        assert!(state.lines.is_empty());
        assert_eq!(state.progress, 100);
        assert_eq!(state.progress_class(), "completed");
    }
}
