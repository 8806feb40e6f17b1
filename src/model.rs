//! Wire types shared by the log stream and the REST endpoints.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque backend identifier of an install job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of a DOM element belonging to this task's viewer, e.g. `progress-<id>`.
    pub fn element_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Success => "SUCCESS",
        }
    }

    /// CSS modifier for a rendered line, e.g. `ilv-log-warn`.
    pub fn css_class(self) -> &'static str {
        match self {
            LogLevel::Info => "ilv-log-info",
            LogLevel::Warn => "ilv-log-warn",
            LogLevel::Error => "ilv-log-error",
            LogLevel::Success => "ilv-log-success",
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_uppercase().as_str() {
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "SUCCESS" => Ok(LogLevel::Success),
            other => Err(serde::de::Error::custom(format!("unknown log level `{other}`"))),
        }
    }
}

/// Time of a log event. The stream sends RFC 3339 strings, older producers
/// send epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Rfc3339(DateTime<FixedOffset>),
}

impl Timestamp {
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Timestamp::Millis(ms) => Local.timestamp_millis_opt(*ms).single(),
            Timestamp::Rfc3339(at) => Some(at.with_timezone(&Local)),
        }
    }

    /// Wall-clock label shown in front of each rendered line.
    pub fn clock_label(&self) -> String {
        self.to_local()
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }
}

/// One event pushed over the live log connection.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: Timestamp,
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: Option<u8>,
    #[serde(default)]
    pub step: Option<String>,
    #[serde(default)]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
}

impl LogMessage {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// A SUCCESS event at 100% ends the install.
    pub fn is_completion(&self) -> bool {
        self.level == LogLevel::Success && self.progress == Some(100)
    }

    /// Step label, `"step i/n: text"` when both counters are known.
    pub fn step_label(&self) -> Option<String> {
        let step = self.step.as_deref().filter(|s| !s.is_empty())?;
        Some(match (self.current_step, self.total_steps) {
            (Some(current), Some(total)) if current > 0 && total > 0 => {
                format!("step {current}/{total}: {step}")
            }
            _ => step.to_string(),
        })
    }
}

fn clamped_progress<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.map(|p| p.clamp(0, 100) as u8))
}

/// Envelope every REST endpoint answers with.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TaskStatus {
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: Option<u8>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LogHistory {
    #[serde(default)]
    pub content: Vec<String>,
}

impl LogHistory {
    /// Plain-text body of a downloaded log.
    pub fn to_text(&self) -> String {
        self.content.join("\n")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InstallAccepted {
    #[serde(rename = "installName")]
    pub install_name: String,
}

/// Body of `POST /v1/soft/install`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InstallParams {
    pub key: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pwd: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_message_with_rfc3339_timestamp() {
        let raw = r#"{"timestamp":"2024-05-01T10:15:30.123456789+08:00","level":"INFO",
            "message":"Downloading nginx","progress":35,"step":"download","current_step":2,"total_steps":5}"#;
        let msg = LogMessage::parse(raw).unwrap();
        assert_eq!(msg.level, LogLevel::Info);
        assert_eq!(msg.progress, Some(35));
        assert_eq!(msg.step_label().as_deref(), Some("step 2/5: download"));
        assert!(matches!(msg.timestamp, Timestamp::Rfc3339(_)));
        assert!(!msg.is_completion());
    }

    #[test]
    fn parses_epoch_millis_and_optional_fields() {
        let msg = LogMessage::parse(r#"{"level":"warn","message":"slow mirror","timestamp":1714529730000}"#)
            .unwrap();
        assert_eq!(msg.level, LogLevel::Warn);
        assert_eq!(msg.timestamp, Timestamp::Millis(1_714_529_730_000));
        assert_eq!(msg.progress, None);
        assert_eq!(msg.step_label(), None);
    }

    #[test]
    fn rejects_unknown_level_and_garbage() {
        assert!(LogMessage::parse(r#"{"level":"TRACE","message":"x","timestamp":0}"#).is_err());
        assert!(LogMessage::parse("not json").is_err());
        assert!(LogMessage::parse(r#"{"level":"INFO"}"#).is_err());
    }

    #[test]
    fn step_label_without_both_counters_is_bare() {
        let msg = LogMessage::parse(
            r#"{"level":"INFO","message":"m","timestamp":0,"step":"configure","current_step":3}"#,
        )
        .unwrap();
        assert_eq!(msg.step_label().as_deref(), Some("configure"));
    }

    #[test]
    fn progress_is_clamped() {
        let msg = LogMessage::parse(r#"{"level":"SUCCESS","message":"done","timestamp":0,"progress":140}"#)
            .unwrap();
        assert_eq!(msg.progress, Some(100));
        assert!(msg.is_completion());
    }

    #[test]
    fn completion_needs_success_level() {
        let msg = LogMessage::parse(r#"{"level":"ERROR","message":"x","timestamp":0,"progress":100}"#)
            .unwrap();
        assert!(!msg.is_completion());
    }

    #[test]
    fn history_text_is_newline_joined() {
        let history: ApiResponse<LogHistory> = serde_json::from_str(
            r#"{"success":true,"data":{"task_id":"t1","content":["a","","b c"],"completed":true}}"#,
        )
        .unwrap();
        assert_eq!(history.data.unwrap().to_text(), "a\n\nb c");
    }

    #[test]
    fn install_params_omit_empty_credentials() {
        let params = InstallParams {
            key: "nginx".into(),
            version: "1.24".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"key": "nginx", "version": "1.24"}));
    }

    #[test]
    fn element_ids_are_prefixed() {
        assert_eq!(TaskId::new("abc").element_id("log"), "log-abc");
    }
}
