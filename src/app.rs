use std::rc::Rc;

use yew::prelude::*;

use crate::components::InstallManager;
use crate::config::ViewerConfig;

// Root component
#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo(|_| ViewerConfig::load(), ());

    html! {
        <ContextProvider<Rc<ViewerConfig>> context={config}>
            <h2>{ "Software installs" }</h2>
            <InstallManager />
        </ContextProvider<Rc<ViewerConfig>>>
    }
}
