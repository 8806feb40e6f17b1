//! REST calls against the panel backend.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::config::ViewerConfig;
use crate::error::{browser_error, ApiError, InstallError};
use crate::model::{ApiResponse, InstallAccepted, InstallParams, LogHistory, TaskId, TaskStatus};

pub const WS_PATH: &str = "/v1/log/ws";
pub const STATUS_PATH: &str = "/v1/log/status";
pub const HISTORY_PATH: &str = "/v1/log/history";
pub const INSTALL_PATH: &str = "/v1/soft/install";

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

fn task_query(task: &TaskId) -> String {
    format!("task_id={}", encode(task.as_str()))
}

/// Unwraps the `{success, message, data}` envelope.
pub fn into_data<T>(resp: ApiResponse<T>) -> Result<T, ApiError> {
    if !resp.success {
        return Err(ApiError::Rejected(resp.message));
    }
    resp.data
        .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
}

pub fn accepted_task(resp: ApiResponse<InstallAccepted>) -> Result<TaskId, ApiError> {
    let accepted = into_data(resp)?;
    if accepted.install_name.is_empty() {
        return Err(ApiError::Decode("installName is empty".to_string()));
    }
    Ok(TaskId::new(accepted.install_name))
}

/// Decodes an envelope even from error statuses, since the backend explains
/// rejections in the body.
async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<ApiResponse<T>, ApiError> {
    let status = resp.status();
    let url = resp.url();
    let body = resp.text().await?;
    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !resp_ok(status) => Err(ApiError::Status { status, url }),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

fn resp_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

pub async fn fetch_status(config: &ViewerConfig, task: &TaskId) -> Result<TaskStatus, ApiError> {
    let url = format!("{}?{}", config.api_url(STATUS_PATH), task_query(task));
    let resp = Request::get(&url).send().await?;
    into_data(read_envelope(resp).await?)
}

pub async fn fetch_history(
    config: &ViewerConfig,
    task: &TaskId,
    limit: u32,
) -> Result<LogHistory, ApiError> {
    let url = format!(
        "{}?{}&limit={}",
        config.api_url(HISTORY_PATH),
        task_query(task),
        limit
    );
    let resp = Request::get(&url).send().await?;
    into_data(read_envelope(resp).await?)
}

/// Bearer token from local storage; empty when none is stored.
pub fn auth_token(config: &ViewerConfig) -> String {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(&config.token_key).ok().flatten())
        .unwrap_or_default()
}

pub async fn start_install(
    config: &ViewerConfig,
    params: &InstallParams,
) -> Result<TaskId, InstallError> {
    let token = auth_token(config);
    let request = Request::post(&config.api_url(INSTALL_PATH))
        .header("Authorization", &format!("Bearer {token}"))
        .json(params)
        .map_err(ApiError::from)?;

    let resp = request.send().await.map_err(ApiError::from)?;
    let envelope = read_envelope::<InstallAccepted>(resp).await?;
    let task = accepted_task(envelope)?;
    log::info!("install of `{}` accepted as task {task}", params.key);
    Ok(task)
}

/// `ws://` or `wss://` URL of a task's live log stream.
pub fn live_url(config: &ViewerConfig, task: &TaskId) -> Result<String, ApiError> {
    let base = if config.api_base.starts_with("http") {
        config
            .api_base
            .trim_end_matches('/')
            .replacen("http", "ws", 1)
    } else {
        let location = web_sys::window()
            .ok_or_else(|| ApiError::Browser("no window".to_string()))?
            .location();
        let protocol = location
            .protocol()
            .map_err(|e| browser_error("location.protocol", e))?;
        let host = location.host().map_err(|e| browser_error("location.host", e))?;
        let scheme = if protocol == "https:" { "wss:" } else { "ws:" };
        format!("{scheme}//{host}{}", config.api_base.trim_end_matches('/'))
    };
    Ok(format!("{base}{WS_PATH}?{}", task_query(task)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(raw: &str) -> ApiResponse<InstallAccepted> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn accepted_install_yields_task_id() {
        let task = accepted_task(envelope(
            r#"{"success":true,"code":0,"message":"ok","data":{"installName":"nginx_1714"}}"#,
        ))
        .unwrap();
        assert_eq!(task, TaskId::new("nginx_1714"));
    }

    #[test]
    fn rejected_install_error_is_backend_message() {
        let err = accepted_task(envelope(r#"{"success":false,"message":"quota exceeded"}"#))
            .map_err(InstallError::from)
            .unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = accepted_task(envelope(r#"{"success":false}"#))
            .map_err(InstallError::from)
            .unwrap_err();
        assert_eq!(err.to_string(), crate::error::INSTALL_FAILED);
    }

    #[test]
    fn success_without_task_is_decode_error() {
        let err = accepted_task(envelope(r#"{"success":true,"data":{"installName":""}}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        let err = accepted_task(envelope(r#"{"success":true}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn status_envelope_unwraps() {
        let resp: ApiResponse<TaskStatus> = serde_json::from_str(
            r#"{"success":true,"data":{"task_id":"t","completed":true,"progress":100}}"#,
        )
        .unwrap();
        let status = into_data(resp).unwrap();
        assert!(status.completed);
        assert_eq!(status.progress, Some(100));
    }
}
