use log::debug;

use crate::model::payment::{ContractId, PaymentSuccess};

use super::protocol::HubInvocation;

/// Which contract group this client wants, and which one the server has
/// actually been asked to join on the current connection.
///
/// Every change goes through here so the old group is always left before a
/// new one is joined, and a reconnect re-joins the wanted group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSubscription {
    desired: Option<ContractId>,
    joined: Option<ContractId>,
    connected: bool,
}

impl GroupSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desired(&self) -> Option<ContractId> {
        self.desired
    }

    pub fn joined(&self) -> Option<ContractId> {
        self.joined
    }

    /// Switches to `contract`. Returns the invocations to send now; empty
    /// while disconnected (the join happens in [`Self::on_connected`]).
    pub fn subscribe(&mut self, contract: ContractId) -> Vec<HubInvocation> {
        self.desired = Some(contract);
        self.sync()
    }

    pub fn unsubscribe(&mut self) -> Vec<HubInvocation> {
        self.desired = None;
        self.sync()
    }

    pub fn on_connected(&mut self) -> Vec<HubInvocation> {
        self.connected = true;
        self.joined = None;
        self.sync()
    }

    /// Group membership does not survive the transport.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.joined = None;
    }

    /// Whether an event belongs to the contract this client subscribed to.
    pub fn accepts(&self, event: &PaymentSuccess) -> bool {
        self.desired == Some(event.contract_id)
    }

    fn sync(&mut self) -> Vec<HubInvocation> {
        if !self.connected || self.joined == self.desired {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if let Some(old) = self.joined.take() {
            debug!("leaving payment group of contract {old}");
            out.push(HubInvocation::LeaveContractGroup(old));
        }
        if let Some(new) = self.desired {
            debug!("joining payment group of contract {new}");
            out.push(HubInvocation::JoinContractGroup(new));
            self.joined = Some(new);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64) -> PaymentSuccess {
        PaymentSuccess {
            contract_id: ContractId(id),
            message: "Pago recibido".into(),
            amount: None,
            paid_at: None,
        }
    }

    #[test]
    fn join_waits_for_connection() {
        let mut sub = GroupSubscription::new();
        assert!(sub.subscribe(ContractId(42)).is_empty());
        assert_eq!(
            sub.on_connected(),
            vec![HubInvocation::JoinContractGroup(ContractId(42))]
        );
        assert_eq!(sub.joined(), Some(ContractId(42)));
    }

    #[test]
    fn switching_leaves_old_group_first() {
        let mut sub = GroupSubscription::new();
        sub.on_connected();
        sub.subscribe(ContractId(42));
        assert_eq!(
            sub.subscribe(ContractId(7)),
            vec![
                HubInvocation::LeaveContractGroup(ContractId(42)),
                HubInvocation::JoinContractGroup(ContractId(7)),
            ]
        );
        assert!(sub.subscribe(ContractId(7)).is_empty());
    }

    #[test]
    fn unsubscribe_leaves_group() {
        let mut sub = GroupSubscription::new();
        sub.on_connected();
        sub.subscribe(ContractId(42));
        assert_eq!(
            sub.unsubscribe(),
            vec![HubInvocation::LeaveContractGroup(ContractId(42))]
        );
        assert!(!sub.accepts(&event(42)));
    }

    #[test]
    fn reconnect_rejoins_desired_group() {
        let mut sub = GroupSubscription::new();
        sub.on_connected();
        sub.subscribe(ContractId(42));
        sub.on_disconnected();
        assert_eq!(sub.joined(), None);
        assert_eq!(
            sub.on_connected(),
            vec![HubInvocation::JoinContractGroup(ContractId(42))]
        );
    }

    #[test]
    fn events_are_filtered_by_contract() {
        let mut sub = GroupSubscription::new();
        sub.subscribe(ContractId(42));
        assert!(sub.accepts(&event(42)));

        sub.subscribe(ContractId(7));
        assert!(!sub.accepts(&event(42)));
    }
}
