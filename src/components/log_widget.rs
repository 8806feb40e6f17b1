use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::components::styles::VIEWER_STYLES;
use crate::config::ViewerConfig;
use crate::download::download_log;
use crate::model::TaskId;
use crate::session::LogSession;
use crate::state::{LogLine, ViewerAction, ViewerState};

#[derive(Properties, PartialEq)]
pub struct LogViewerProps {
    pub task_id: TaskId,
}

/// Live log panel for one install task. The connection lives exactly as long
/// as the component is mounted.
#[function_component(LogViewer)]
pub fn log_viewer(props: &LogViewerProps) -> Html {
    let config = use_context::<Rc<ViewerConfig>>().unwrap_or_default();
    let max_lines = config.max_lines;
    let state = use_reducer(move || ViewerState::new(max_lines));
    let log_ref = use_node_ref();

    {
        let dispatcher = state.dispatcher();
        let config = config.clone();
        use_effect_with_deps(
            move |task_id: &TaskId| {
                let notify = Callback::from(move |action: ViewerAction| dispatcher.dispatch(action));
                let session = LogSession::start(task_id.clone(), config, notify);
                move || session.teardown()
            },
            props.task_id.clone(),
        );
    }

    // Follow the tail as lines arrive.
    {
        let log_ref = log_ref.clone();
        use_effect_with_deps(
            move |_| {
                scroll_to_bottom(&log_ref);
                || ()
            },
            state.lines.last_seq(),
        );
    }

    let on_scroll = {
        let log_ref = log_ref.clone();
        Callback::from(move |_: MouseEvent| scroll_to_bottom(&log_ref))
    };

    let on_clear = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| {
            if confirm("Clear the log output?") {
                dispatcher.dispatch(ViewerAction::Clear);
            }
        })
    };

    let on_download = {
        let config = config.clone();
        let task = props.task_id.clone();
        Callback::from(move |_: MouseEvent| {
            let config = config.clone();
            let task = task.clone();
            spawn_local(async move {
                if let Err(e) = download_log(&config, &task).await {
                    log::error!("downloading log of task {task} failed: {e}");
                    alert("Downloading the log failed, please try again later.");
                }
            });
        })
    };

    let task = &props.task_id;
    html! {
        <div class="ilv-viewer">
            <style>{ VIEWER_STYLES }</style>
            <div class="ilv-header">
                <h3>{ format!("Install log - task {task}") }</h3>
                <div class="ilv-status" id={task.element_id("status")}>
                    <span class="ilv-status-text">{ state.status.label() }</span>
                    <div class={classes!("ilv-indicator", state.status.css_class())}></div>
                </div>
            </div>

            <div class="ilv-progress-section">
                <div class="ilv-progress-row">
                    <div class="ilv-progress-bar" id={task.element_id("progress")}>
                        <div
                            class={classes!("ilv-progress-fill", state.progress_class())}
                            style={format!("width: {}%", state.progress)}
                        ></div>
                    </div>
                    <span class="ilv-progress-text">{ format!("{}%", state.progress) }</span>
                </div>
                <div class="ilv-step" id={task.element_id("step")}>{ state.step.clone() }</div>
            </div>

            <div class="ilv-log" id={task.element_id("log")} ref={log_ref}>
                <div class="ilv-log-content">
                    { for state.lines.iter().map(|line| html! {
                        <LogLineView key={line.seq.to_string()} line={line.clone()} />
                    }) }
                </div>
            </div>

            <div class="ilv-controls">
                <button class="ilv-btn-scroll" onclick={on_scroll}>{ "Scroll to bottom" }</button>
                <button class="ilv-btn-clear" onclick={on_clear}>{ "Clear log" }</button>
                <button class="ilv-btn-download" onclick={on_download}>{ "Download log" }</button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LogLineProps {
    pub line: LogLine,
}

/// One rendered line. Message text is emitted as a text node, never as markup.
#[function_component(LogLineView)]
pub fn log_line_view(props: &LogLineProps) -> Html {
    let line = &props.line;
    html! {
        <div class={classes!("ilv-line", line.level.css_class())}>
            <span class="ilv-time">{ format!("[{}]", line.clock) }</span>
            <span class="ilv-level">{ format!("[{}]", line.level.as_str()) }</span>
            <span class="ilv-message">{ line.text.clone() }</span>
        </div>
    }
}

fn scroll_to_bottom(node: &NodeRef) {
    if let Some(el) = node.cast::<Element>() {
        el.set_scroll_top(el.scroll_height());
    }
}

fn confirm(question: &str) -> bool {
    web_sys::window()
        .map(|w| w.confirm_with_message(question).unwrap_or(false))
        .unwrap_or(false)
}

fn alert(text: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(text) {
            log::warn!("alert failed: {e:?}");
        }
    }
}
