//! Payment notification indicator for one contract.
//!
//! Owns a [`PaymentHub`] for as long as it is mounted: the connection opens
//! on create, follows `contract_id` changes by leaving the old group and
//! joining the new one, and is closed on destroy. Every payment for the
//! subscribed contract raises a toast, reaches the caller through
//! `on_payment` and is published on the bus so views showing that contract
//! can refresh.

use common::hub::{ConnectionState, HubStatus};
use common::model::payment::{ContractId, PaymentSuccess};
use log::info;
use num_format::{Locale, ToFormattedString};
use yew::prelude::*;

use crate::services::realtime::PaymentHub;
use crate::services::store::{RefreshSignal, SignalBus};
use crate::toast::show_toast;

#[derive(Properties, PartialEq, Clone)]
pub struct PaymentNotificationProps {
    /// Contract to listen to. `None` keeps the connection but joins no group.
    #[prop_or_default]
    pub contract_id: Option<ContractId>,
    pub hub_url: AttrValue,
    #[prop_or_default]
    pub on_payment: Callback<PaymentSuccess>,
}

pub enum Msg {
    Status(HubStatus),
    Payment(PaymentSuccess),
}

pub struct PaymentNotificationComponent {
    hub: Option<PaymentHub>,
    status: HubStatus,
    bus: Option<SignalBus>,
    last_payment: Option<PaymentSuccess>,
}

impl PaymentNotificationComponent {
    fn open(ctx: &Context<Self>) -> PaymentHub {
        let props = ctx.props();
        let hub = PaymentHub::open(
            &props.hub_url,
            ctx.link().callback(Msg::Status),
            ctx.link().callback(Msg::Payment),
        );
        if let Some(contract) = props.contract_id {
            hub.subscribe(contract);
        }
        hub
    }
}

impl Component for PaymentNotificationComponent {
    type Message = Msg;
    type Properties = PaymentNotificationProps;

    fn create(ctx: &Context<Self>) -> Self {
        let bus = ctx
            .link()
            .context::<SignalBus>(Callback::noop())
            .map(|(bus, _handle)| bus);
        Self {
            hub: Some(Self::open(ctx)),
            status: HubStatus::default(),
            bus,
            last_payment: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Status(status) => {
                if self.status == status {
                    return false;
                }
                self.status = status;
                true
            }
            Msg::Payment(payment) => {
                info!("payment received for contract {}", payment.contract_id);
                show_toast(&payment_toast(&payment));
                if let Some(bus) = &self.bus {
                    bus.publish(RefreshSignal::ContractPayments(payment.contract_id));
                }
                ctx.props().on_payment.emit(payment.clone());
                self.last_payment = Some(payment);
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.hub_url != old_props.hub_url {
            // Dropping the old hub closes its socket.
            self.hub = Some(Self::open(ctx));
            self.status = HubStatus::default();
            self.last_payment = None;
            return true;
        }
        if props.contract_id != old_props.contract_id {
            if let Some(hub) = &self.hub {
                match props.contract_id {
                    Some(contract) => hub.subscribe(contract),
                    None => hub.unsubscribe(),
                }
            }
            self.last_payment = None;
            return true;
        }
        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.status.state;
        let dot = match state {
            ConnectionState::Connected => "#43a047",
            ConnectionState::Connecting | ConnectionState::Reconnecting => "#fb8c00",
            ConnectionState::Disconnected => "#e53935",
        };
        let contract = ctx
            .props()
            .contract_id
            .map(|id| format!("Contrato {id}"))
            .unwrap_or_else(|| "Sin contrato".to_string());

        html! {
            <div class="payment-indicator" title={self.status.error.clone().unwrap_or_default()}>
                <span
                    class="payment-indicator-dot"
                    style={format!("display:inline-block;width:8px;height:8px;border-radius:50%;background:{dot};")}
                />
                <span class="payment-indicator-state">{ state.label() }</span>
                <span class="payment-indicator-contract">{ contract }</span>
                if let Some(payment) = &self.last_payment {
                    <span class="payment-indicator-last">{ payment_toast(payment) }</span>
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(hub) = self.hub.take() {
            hub.close();
        }
    }
}

/// Toast text for a payment, with the amount grouped the Spanish way when
/// the server sent one.
fn payment_toast(payment: &PaymentSuccess) -> String {
    match payment.amount {
        Some(amount) => format!("{} (${})", payment.message, format_amount(amount)),
        None => payment.message.clone(),
    }
}

/// Groups thousands and keeps cents only when there are any.
fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let units = (cents / 100).to_formatted_string(&Locale::es);
    match cents % 100 {
        0 => format!("{sign}{units}"),
        rest => format!("{sign}{units}{}{rest:02}", Locale::es.decimal()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: Option<f64>) -> PaymentSuccess {
        PaymentSuccess {
            contract_id: ContractId(42),
            message: "Pago recibido".to_string(),
            amount,
            paid_at: None,
        }
    }

    #[test]
    fn toast_groups_amount_digits() {
        assert_eq!(
            payment_toast(&payment(Some(1_250_000.0))),
            "Pago recibido ($1.250.000)"
        );
    }

    #[test]
    fn toast_keeps_cents_of_decimal_amounts() {
        assert_eq!(
            payment_toast(&payment(Some(1_500_000.5))),
            "Pago recibido ($1.500.000,50)"
        );
        assert_eq!(format_amount(-0.25), "-0,25");
    }

    #[test]
    fn toast_without_amount_is_the_message() {
        assert_eq!(payment_toast(&payment(None)), "Pago recibido");
    }
}
