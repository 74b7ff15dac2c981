//! Explicit publish/subscribe channel for "something changed elsewhere".
//!
//! Components that need to react to another component's work (the template
//! list after the editor saves, pages showing a contract after a payment)
//! subscribe here instead of listening for ad hoc window events. The bus is
//! handed out through a Yew context, so the dependency is visible in the
//! component that takes it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use common::model::payment::ContractId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSignal {
    Templates,
    ContractPayments(ContractId),
}

type Listener = Rc<dyn Fn(&RefreshSignal)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct SignalBus {
    inner: Rc<RefCell<Listeners>>,
}

impl PartialEq for SignalBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned guard is dropped.
    #[must_use = "the listener is removed when the subscription is dropped"]
    pub fn subscribe<F>(&self, listener: F) -> BusSubscription
    where
        F: Fn(&RefreshSignal) + 'static,
    {
        let mut listeners = self.inner.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        BusSubscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    pub fn publish(&self, signal: RefreshSignal) {
        // Listeners may subscribe or drop subscriptions while handling.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        log::debug!("publishing {signal:?} to {} listeners", listeners.len());
        for listener in listeners {
            listener(&signal);
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

pub struct BusSubscription {
    id: u64,
    bus: Weak<RefCell<Listeners>>,
}

impl Drop for BusSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_receive_published_signals() {
        let bus = SignalBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = bus.subscribe(move |s| sink.borrow_mut().push(*s));

        bus.publish(RefreshSignal::Templates);
        bus.publish(RefreshSignal::ContractPayments(ContractId(42)));

        assert_eq!(
            *seen.borrow(),
            vec![
                RefreshSignal::Templates,
                RefreshSignal::ContractPayments(ContractId(42))
            ]
        );
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let bus = SignalBus::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = bus.subscribe(move |_| counter.set(counter.get() + 1));

        bus.publish(RefreshSignal::Templates);
        drop(sub);
        bus.publish(RefreshSignal::Templates);

        assert_eq!(count.get(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn clones_share_listeners() {
        let bus = SignalBus::new();
        let other = bus.clone();
        assert!(bus == other);
        assert!(bus != SignalBus::new());

        let hit = Rc::new(Cell::new(false));
        let flag = Rc::clone(&hit);
        let _sub = other.subscribe(move |_| flag.set(true));
        bus.publish(RefreshSignal::Templates);
        assert!(hit.get());
    }
}
