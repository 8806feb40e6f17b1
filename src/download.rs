//! Saving a task's full log history as a local text file.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::api;
use crate::config::ViewerConfig;
use crate::error::{browser_error, ApiError};
use crate::model::TaskId;

pub fn log_file_name(task: &TaskId) -> String {
    format!("install_log_{task}.txt")
}

/// Fetches the history and hands it to the browser as a download.
pub async fn download_log(config: &ViewerConfig, task: &TaskId) -> Result<(), ApiError> {
    let history = api::fetch_history(config, task, config.history_limit).await?;
    let content = history.to_text();
    log::info!(
        "saving {} history lines of task {task}",
        history.content.len()
    );
    save_text_file(&log_file_name(task), &content)
}

/// Saves `content` through a temporary object URL and anchor.
pub fn save_text_file(file_name: &str, content: &str) -> Result<(), ApiError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ApiError::Browser("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| ApiError::Browser("no document body".to_string()))?;

    let parts = js_sys::Array::of1(&content.into());
    let options = BlobPropertyBag::new();
    options.set_type("text/plain");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| browser_error("Blob", e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| browser_error("createObjectURL", e))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| browser_error("createElement", e))?
        .dyn_into()
        .map_err(|_| ApiError::Browser("anchor cast".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let result = body
        .append_child(&anchor)
        .map(|_| {
            anchor.click();
        })
        .and_then(|_| body.remove_child(&anchor).map(|_| ()))
        .map_err(|e| browser_error("anchor click", e));
    if let Err(e) = Url::revoke_object_url(&url) {
        log::warn!("revoking object url failed: {e:?}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_task() {
        assert_eq!(log_file_name(&TaskId::new("redis_42")), "install_log_redis_42.txt");
    }
}
