//! Pieces of the real-time payment subscription that do not depend on a
//! socket: reconnect schedule, connection state machine, group bookkeeping
//! and the hub wire format.

pub mod backoff;
pub mod protocol;
pub mod state;
pub mod subscription;

pub use backoff::ReconnectPolicy;
pub use protocol::{FrameReader, HubError, HubInvocation, HubMessage};
pub use state::{ConnectionMachine, ConnectionState, HubStatus, NextStep, TransitionError};
pub use subscription::GroupSubscription;
