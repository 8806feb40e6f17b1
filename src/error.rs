use thiserror::Error;

/// Message used when the backend rejects an install without saying why.
pub const INSTALL_FAILED: &str = "install request failed";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Backend rejected request: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    #[error("Browser API error: {0}")]
    Browser(String),
}

impl ApiError {
    /// Backend-supplied explanation, if the failure carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

/// Failure of `start_install`. Displays the backend's message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InstallError {
    pub message: String,
}

impl InstallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ApiError> for InstallError {
    fn from(err: ApiError) -> Self {
        match err.backend_message() {
            Some(message) => InstallError::new(message),
            None => {
                log::debug!("install failed without backend message: {err}");
                InstallError::new(INSTALL_FAILED)
            }
        }
    }
}

/// Converts a `JsValue` failure from a browser API into an `ApiError`.
pub fn browser_error(context: &str, err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Browser(format!("{context}: {err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_install_keeps_backend_text() {
        let err = InstallError::from(ApiError::Rejected(Some("quota exceeded".into())));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn silent_rejection_uses_fallback() {
        let err = InstallError::from(ApiError::Rejected(Some(String::new())));
        assert_eq!(err.to_string(), INSTALL_FAILED);
        let err = InstallError::from(ApiError::Status {
            status: 502,
            url: "/v1/soft/install".into(),
        });
        assert_eq!(err.to_string(), INSTALL_FAILED);
    }
}
