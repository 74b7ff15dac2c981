use common::model::payment::ContractId;
use yew::{html, AttrValue, Component, Context, ContextProvider, Html};

use crate::components::payments::PaymentNotificationComponent;
use crate::components::templates::list::TemplateListComponent;
use crate::config::{app_config, contract_id_from_location};
use crate::services::store::SignalBus;

/// Root component: provides the refresh bus to the whole tree.
pub struct App {
    bus: SignalBus,
    contract_id: Option<ContractId>,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            bus: SignalBus::new(),
            contract_id: contract_id_from_location(),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let hub_url = AttrValue::from(app_config().payment_hub_url.clone());
        html! {
            <ContextProvider<SignalBus> context={self.bus.clone()}>
                <div class="app">
                    if self.contract_id.is_some() {
                        <PaymentNotificationComponent contract_id={self.contract_id} {hub_url} />
                    }
                    <TemplateListComponent />
                </div>
            </ContextProvider<SignalBus>>
        }
    }
}
