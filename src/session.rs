//! Live connection driver for one task: WebSocket stream, reconnect timer and
//! the status poll that stands in while the stream is down.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, MessageEvent, WebSocket};
use yew::Callback;

use crate::api;
use crate::config::{ViewerConfig, NORMAL_CLOSURE};
use crate::link::{Directive, LinkState};
use crate::model::{LogMessage, TaskId};
use crate::state::{ConnectionStatus, ViewerAction};

struct Socket {
    ws: WebSocket,
    listeners: Vec<EventListener>,
}

impl Socket {
    /// Detaches the handlers before closing so no event reaches a dead session.
    fn close(self) {
        let Socket { ws, listeners } = self;
        drop(listeners);
        let state = ws.ready_state();
        if state == WebSocket::CONNECTING || state == WebSocket::OPEN {
            if let Err(e) = ws.close_with_code(NORMAL_CLOSURE) {
                log::warn!("closing log socket failed: {e:?}");
            }
        }
    }
}

struct Inner {
    task: TaskId,
    config: Rc<ViewerConfig>,
    link: LinkState,
    notify: Callback<ViewerAction>,
    socket: Option<Socket>,
    poll: Option<Interval>,
    reconnect: Option<Timeout>,
}

/// Owns every browser resource of a viewer. Dropping it tears them down.
pub struct LogSession {
    inner: Rc<RefCell<Inner>>,
}

impl LogSession {
    pub fn start(task: TaskId, config: Rc<ViewerConfig>, notify: Callback<ViewerAction>) -> Self {
        log::info!("starting log session for task {task}");
        let inner = Rc::new(RefCell::new(Inner {
            task,
            config,
            link: LinkState::default(),
            notify,
            socket: None,
            poll: None,
            reconnect: None,
        }));
        connect(&inner);
        start_polling(&inner);
        Self { inner }
    }

    /// Closes the socket and cancels the poll and any pending reconnect.
    /// Safe to call more than once.
    pub fn teardown(&self) {
        let socket = {
            let mut inner = self.inner.borrow_mut();
            if inner.link.is_shut_down() {
                return;
            }
            log::info!("tearing down log session for task {}", inner.task);
            inner.link.shut_down();
            inner.reconnect.take();
            inner.poll.take();
            inner.socket.take()
        };
        if let Some(socket) = socket {
            socket.close();
        }
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn emit_all(inner: &Rc<RefCell<Inner>>, actions: Vec<ViewerAction>) {
    let notify = inner.borrow().notify.clone();
    for action in actions {
        notify.emit(action);
    }
}

fn connect(rc: &Rc<RefCell<Inner>>) {
    let url = {
        let inner = rc.borrow();
        if inner.link.is_shut_down() {
            return;
        }
        api::live_url(&inner.config, &inner.task)
    };
    let url = match url {
        Ok(url) => url,
        Err(e) => {
            log::error!("cannot build log stream url: {e}");
            emit_all(rc, vec![ViewerAction::Status(ConnectionStatus::Error)]);
            return;
        }
    };

    let ws = match WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            log::error!("opening log stream {url} failed: {e:?}");
            let status = rc.borrow_mut().link.on_error();
            emit_all(rc, vec![ViewerAction::Status(status)]);
            return;
        }
    };
    log::debug!("connecting to {url}");

    let listeners = vec![
        on_open(&ws, Rc::downgrade(rc)),
        on_message(&ws, Rc::downgrade(rc)),
        on_error(&ws, Rc::downgrade(rc)),
        on_close(&ws, Rc::downgrade(rc)),
    ];

    let previous = rc.borrow_mut().socket.replace(Socket { ws, listeners });
    if let Some(previous) = previous {
        previous.close();
    }
}

fn on_open(ws: &WebSocket, weak: Weak<RefCell<Inner>>) -> EventListener {
    EventListener::new(ws, "open", move |_| {
        let Some(rc) = weak.upgrade() else { return };
        log::info!("log stream connected for task {}", rc.borrow().task);
        let status = rc.borrow_mut().link.on_open();
        emit_all(&rc, vec![ViewerAction::Status(status)]);
    })
}

fn on_message(ws: &WebSocket, weak: Weak<RefCell<Inner>>) -> EventListener {
    EventListener::new(ws, "message", move |event| {
        let Some(rc) = weak.upgrade() else { return };
        let Some(raw) = event
            .dyn_ref::<MessageEvent>()
            .and_then(|e| e.data().as_string())
        else {
            log::warn!("ignoring non-text log frame");
            return;
        };
        let msg = match LogMessage::parse(&raw) {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("dropping malformed log message: {e}");
                return;
            }
        };

        let directive = rc.borrow_mut().link.on_message(&msg);
        let mut actions = vec![ViewerAction::Message(msg)];
        if directive == Directive::CloseNormally {
            actions.push(ViewerAction::Status(ConnectionStatus::Completed));
            let inner = rc.borrow();
            log::info!("task {} completed, closing log stream", inner.task);
            if let Some(socket) = inner.socket.as_ref() {
                if let Err(e) = socket.ws.close_with_code(NORMAL_CLOSURE) {
                    log::warn!("closing completed log stream failed: {e:?}");
                }
            }
        }
        emit_all(&rc, actions);
    })
}

fn on_error(ws: &WebSocket, weak: Weak<RefCell<Inner>>) -> EventListener {
    EventListener::new(ws, "error", move |_| {
        let Some(rc) = weak.upgrade() else { return };
        log::error!("log stream error for task {}", rc.borrow().task);
        let status = rc.borrow_mut().link.on_error();
        emit_all(&rc, vec![ViewerAction::Status(status)]);
    })
}

fn on_close(ws: &WebSocket, weak: Weak<RefCell<Inner>>) -> EventListener {
    EventListener::new(ws, "close", move |event| {
        let Some(rc) = weak.upgrade() else { return };
        let (code, reason) = event
            .dyn_ref::<CloseEvent>()
            .map(|e| (e.code(), e.reason()))
            .unwrap_or((0, String::new()));
        log::info!("log stream closed: {code} {reason}");

        let (directive, status) = {
            let mut inner = rc.borrow_mut();
            let directive = inner.link.on_close(code);
            (directive, inner.link.status())
        };
        if directive == Directive::Reconnect {
            schedule_reconnect(&rc);
        }
        emit_all(&rc, vec![ViewerAction::Status(status)]);
    })
}

fn schedule_reconnect(rc: &Rc<RefCell<Inner>>) {
    let weak = Rc::downgrade(rc);
    let mut inner = rc.borrow_mut();
    let delay = inner.config.reconnect_delay_ms;
    inner.reconnect = Some(Timeout::new(delay, move || {
        if let Some(rc) = weak.upgrade() {
            log::info!("reconnecting log stream for task {}", rc.borrow().task);
            connect(&rc);
        }
    }));
}

fn start_polling(rc: &Rc<RefCell<Inner>>) {
    let weak = Rc::downgrade(rc);
    let mut inner = rc.borrow_mut();
    let period = inner.config.poll_interval_ms;
    inner.poll = Some(Interval::new(period, move || {
        let Some(rc) = weak.upgrade() else { return };
        if rc.borrow().link.should_poll() {
            spawn_local(poll_status(Rc::downgrade(&rc)));
        }
    }));
}

async fn poll_status(weak: Weak<RefCell<Inner>>) {
    let (config, task) = {
        let Some(rc) = weak.upgrade() else { return };
        let inner = rc.borrow();
        (inner.config.clone(), inner.task.clone())
    };

    let status = match api::fetch_status(&config, &task).await {
        Ok(status) => status,
        Err(e) => {
            log::warn!("status poll for task {task} failed: {e}");
            return;
        }
    };

    let Some(rc) = weak.upgrade() else { return };
    let mut actions = Vec::new();
    {
        let mut inner = rc.borrow_mut();
        if !inner.link.should_poll() {
            return;
        }
        if let Some(progress) = status.progress {
            actions.push(ViewerAction::Progress(progress));
        }
        if status.completed {
            log::info!("status poll reports task {task} completed");
            inner.link.mark_completed();
            inner.poll.take();
            actions.push(ViewerAction::Status(ConnectionStatus::Completed));
        }
    }
    emit_all(&rc, actions);
}
