use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::components::log_widget::LogViewer;
use crate::components::styles::MANAGER_STYLES;
use crate::config::ViewerConfig;
use crate::error::InstallError;
use crate::model::{InstallParams, TaskId};

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveInstall {
    pub task: TaskId,
    /// Software key the install was requested for.
    pub software: String,
}

/// Tasks with a mounted viewer, in start order. Task ids are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveInstalls {
    entries: Vec<ActiveInstall>,
}

impl ActiveInstalls {
    pub fn contains(&self, task: &TaskId) -> bool {
        self.entries.iter().any(|entry| &entry.task == task)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveInstall> {
        self.entries.iter()
    }
}

pub enum InstallsAction {
    Start(ActiveInstall),
    Stop(TaskId),
}

impl Reducible for ActiveInstalls {
    type Action = InstallsAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            InstallsAction::Start(entry) => {
                if self.contains(&entry.task) {
                    log::warn!("task {} already has a viewer", entry.task);
                    return self;
                }
                let mut next = (*self).clone();
                next.entries.push(entry);
                Rc::new(next)
            }
            InstallsAction::Stop(task) => {
                if !self.contains(&task) {
                    return self;
                }
                log::info!("stopping viewer for task {task}");
                let mut next = (*self).clone();
                next.entries.retain(|entry| entry.task != task);
                Rc::new(next)
            }
        }
    }
}

/// Posts the install request and registers a viewer for the new task.
pub async fn start_install(
    config: &ViewerConfig,
    params: InstallParams,
    installs: &UseReducerDispatcher<ActiveInstalls>,
) -> Result<TaskId, InstallError> {
    let task = api::start_install(config, &params).await.map_err(|e| {
        log::error!("starting install of `{}` failed: {e}", params.key);
        e
    })?;
    installs.dispatch(InstallsAction::Start(ActiveInstall {
        task: task.clone(),
        software: params.key,
    }));
    Ok(task)
}

/// Removes the task's viewer; unmounting it tears its connection down.
pub fn stop_install(installs: &UseReducerDispatcher<ActiveInstalls>, task: TaskId) {
    installs.dispatch(InstallsAction::Stop(task));
}

#[function_component(InstallManager)]
pub fn install_manager() -> Html {
    let config = use_context::<Rc<ViewerConfig>>().unwrap_or_default();
    let installs = use_reducer(ActiveInstalls::default);
    let params = use_state(InstallParams::default);
    let error = use_state(|| None::<String>);
    let pending = use_state(|| false);

    let field = |update: fn(&mut InstallParams, String)| {
        let params = params.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            let mut next = (*params).clone();
            update(&mut next, value);
            params.set(next);
        })
    };

    let on_submit = {
        let config = config.clone();
        let params = params.clone();
        let error = error.clone();
        let pending = pending.clone();
        let installs = installs.dispatcher();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *pending {
                return;
            }
            if params.key.trim().is_empty() {
                error.set(Some("Software key is required".to_string()));
                return;
            }
            pending.set(true);
            error.set(None);

            let config = config.clone();
            let request = (*params).clone();
            let error = error.clone();
            let pending = pending.clone();
            let installs = installs.clone();
            spawn_local(async move {
                if let Err(e) = start_install(&config, request, &installs).await {
                    error.set(Some(e.to_string()));
                }
                pending.set(false);
            });
        })
    };

    html! {
        <div class="ilv-manager">
            <style>{ MANAGER_STYLES }</style>
            <form class="ilv-form" onsubmit={on_submit}>
                <input placeholder="software key" value={params.key.clone()}
                    oninput={field(|p, v| p.key = v)} />
                <input placeholder="version" value={params.version.clone()}
                    oninput={field(|p, v| p.version = v)} />
                <input placeholder="port" value={params.port.clone()}
                    oninput={field(|p, v| p.port = v)} />
                <input placeholder="username" value={params.username.clone()}
                    oninput={field(|p, v| p.username = v)} />
                <input type="password" placeholder="password" value={params.pwd.clone()}
                    oninput={field(|p, v| p.pwd = v)} />
                <button type="submit" disabled={*pending}>{ "Install" }</button>
            </form>

            if let Some(message) = (*error).clone() {
                <div class="ilv-error">{ message }</div>
            }

            <ul class="ilv-active">
                { for installs.iter().map(|entry| {
                    let on_stop = {
                        let installs = installs.dispatcher();
                        let task = entry.task.clone();
                        Callback::from(move |_: MouseEvent| stop_install(&installs, task.clone()))
                    };
                    html! {
                        <li key={entry.task.to_string()}>
                            { format!("{} ({}) ", entry.software, entry.task) }
                            <button onclick={on_stop}>{ "Stop" }</button>
                        </li>
                    }
                }) }
            </ul>

            <div id={config.container_id.clone()}>
                { for installs.iter().map(|entry| html! {
                    <LogViewer key={entry.task.to_string()} task_id={entry.task.clone()} />
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(task: &str) -> ActiveInstall {
        ActiveInstall {
            task: TaskId::new(task),
            software: "nginx".into(),
        }
    }

    #[test]
    fn start_and_stop_track_viewers() {
        let installs = Rc::new(ActiveInstalls::default())
            .reduce(InstallsAction::Start(entry("a")))
            .reduce(InstallsAction::Start(entry("b")));
        assert_eq!(installs.len(), 2);

        let installs = installs.reduce(InstallsAction::Stop(TaskId::new("a")));
        assert!(!installs.contains(&TaskId::new("a")));
        assert!(installs.contains(&TaskId::new("b")));
    }

    #[test]
    fn stopping_unknown_task_leaves_mapping_untouched() {
        let installs = Rc::new(ActiveInstalls::default()).reduce(InstallsAction::Start(entry("a")));
        let after = installs.clone().reduce(InstallsAction::Stop(TaskId::new("missing")));
        assert!(Rc::ptr_eq(&installs, &after));
        assert_eq!(*after, *installs);
    }

    #[test]
    fn duplicate_task_gets_one_viewer() {
        let installs = Rc::new(ActiveInstalls::default())
            .reduce(InstallsAction::Start(entry("a")))
            .reduce(InstallsAction::Start(entry("a")));
        assert_eq!(installs.len(), 1);
    }
}
