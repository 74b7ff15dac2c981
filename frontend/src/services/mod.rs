//! Side-effecting collaborators of the components: REST calls, debounced
//! timers, the payment hub connection and the refresh signal bus.

pub mod api;
pub mod debounce;
pub mod realtime;
pub mod store;
