//! Template editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering and helpers.
//!
//! - On create, load the template to edit from the server (never a cached
//!   copy) or start an empty draft and fetch the placeholder schema of the
//!   preselected type.
//! - On destroy, cancel the pending extraction timer and invalidate every
//!   request still in flight.

use yew::platform::spawn_local;
use yew::prelude::*;

use crate::services::store::SignalBus;

mod dialogs;
mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::TemplateEditorProps;
pub use state::TemplateEditorComponent;

impl Component for TemplateEditorComponent {
    type Message = Msg;
    type Properties = TemplateEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        let bus = ctx
            .link()
            .context::<SignalBus>(Callback::noop())
            .map(|(bus, _handle)| bus);
        let mut component = TemplateEditorComponent::new(ctx.props().default_type, bus);

        match ctx.props().template_id {
            Some(id) => {
                component.loading = true;
                let api = component.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.get(id).await {
                        Ok(template) => link.send_message(Msg::TemplateLoaded(template)),
                        Err(e) => link.send_message(Msg::TemplateLoadFailed(e.to_string())),
                    }
                });
            }
            None => {
                let effect = component.session.start();
                update::apply(&mut component, ctx, effect);
            }
        }
        component
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        let effect = self.session.close();
        update::apply(self, ctx, effect);
    }
}
