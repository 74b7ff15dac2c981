//! Connection lifecycle of the real-time client.
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Reconnecting -> Connected
//!                     |                          |
//!                     +-> Disconnected <---------+  (failed / abandoned)
//! ```
//!
//! The machine owns the observable `error` and the attempt counter that picks
//! the next delay from the [`ReconnectPolicy`]. It performs no I/O; the
//! browser client drives it and reports each snapshot to the view.

use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use super::backoff::ReconnectPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Conexión perdida",
            ConnectionState::Connecting => "Conectando…",
            ConnectionState::Connected => "Conectado",
            ConnectionState::Reconnecting => "Reconectando…",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {event} while {from}")]
pub struct TransitionError {
    pub from: ConnectionState,
    pub event: &'static str,
}

/// What the view needs to render the connection indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStatus {
    pub state: ConnectionState,
    pub error: Option<String>,
}

/// What the driver should do after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    RetryAfter(Duration),
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    error: Option<String>,
    attempt: u32,
    policy: ReconnectPolicy,
}

impl ConnectionMachine {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            error: None,
            attempt: 0,
            policy,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn status(&self) -> HubStatus {
        HubStatus {
            state: self.state,
            error: self.error.clone(),
        }
    }

    /// `Disconnected -> Connecting`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.expect(&[ConnectionState::Disconnected], "start")?;
        self.state = ConnectionState::Connecting;
        Ok(())
    }

    /// Handshake completed. Clears the error and restarts the schedule.
    pub fn connected(&mut self) -> Result<(), TransitionError> {
        self.expect(
            &[ConnectionState::Connecting, ConnectionState::Reconnecting],
            "complete connection",
        )?;
        if self.attempt > 0 {
            debug!("hub connected after {} retries", self.attempt);
        }
        self.state = ConnectionState::Connected;
        self.error = None;
        self.attempt = 0;
        Ok(())
    }

    /// A connect attempt failed. The first connection falls back to
    /// `Disconnected`; a reconnect stays in `Reconnecting` until the policy
    /// gives up.
    pub fn failed(&mut self, error: impl Into<String>) -> Result<NextStep, TransitionError> {
        self.expect(
            &[ConnectionState::Connecting, ConnectionState::Reconnecting],
            "fail a connection attempt",
        )?;
        let error = error.into();
        warn!("hub connection attempt {} failed: {error}", self.attempt + 1);
        self.error = Some(error);
        let step = self.next_step();
        self.state = match (self.state, step) {
            (ConnectionState::Reconnecting, NextStep::RetryAfter(_)) => {
                ConnectionState::Reconnecting
            }
            _ => ConnectionState::Disconnected,
        };
        Ok(step)
    }

    /// Transport dropped while connected: `Connected -> Reconnecting`.
    pub fn lost(&mut self, error: impl Into<String>) -> Result<NextStep, TransitionError> {
        self.expect(&[ConnectionState::Connected], "lose the connection")?;
        let error = error.into();
        warn!("hub connection lost: {error}");
        self.error = Some(error);
        let step = self.next_step();
        self.state = match step {
            NextStep::RetryAfter(_) => ConnectionState::Reconnecting,
            NextStep::GiveUp => ConnectionState::Disconnected,
        };
        Ok(step)
    }

    /// Deliberate shutdown from any state. Not an error.
    pub fn close(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.error = None;
        self.attempt = 0;
    }

    fn next_step(&mut self) -> NextStep {
        match self.policy.delay_for(self.attempt) {
            Some(delay) => {
                self.attempt += 1;
                NextStep::RetryAfter(delay)
            }
            None => NextStep::GiveUp,
        }
    }

    fn expect(
        &self,
        allowed: &[ConnectionState],
        event: &'static str,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.state,
                event,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::protocol::HANDSHAKE_TIMEOUT;

    fn connected() -> ConnectionMachine {
        let mut machine = ConnectionMachine::new(ReconnectPolicy::forever());
        machine.start().unwrap();
        machine.connected().unwrap();
        machine
    }

    fn delay_ms(step: NextStep) -> u128 {
        match step {
            NextStep::RetryAfter(d) => d.as_millis(),
            NextStep::GiveUp => panic!("policy gave up"),
        }
    }

    #[test]
    fn happy_path() {
        let machine = connected();
        assert_eq!(machine.state(), ConnectionState::Connected);
        assert_eq!(machine.error(), None);
    }

    #[test]
    fn repeated_failures_follow_schedule() {
        let mut machine = connected();
        let mut delays = vec![delay_ms(machine.lost("socket closed").unwrap())];
        for _ in 0..4 {
            delays.push(delay_ms(machine.failed("refused").unwrap()));
            assert_eq!(machine.state(), ConnectionState::Reconnecting);
        }
        assert_eq!(delays, vec![0, 2_000, 10_000, 30_000, 30_000]);
        assert_eq!(machine.error(), Some("refused"));
    }

    #[test]
    fn schedule_restarts_after_each_recovery() {
        let mut machine = connected();
        machine.lost("drop").unwrap();
        machine.failed("refused").unwrap();
        machine.connected().unwrap();
        assert_eq!(machine.error(), None);

        assert_eq!(delay_ms(machine.lost("drop again").unwrap()), 0);
        assert_eq!(delay_ms(machine.failed("refused").unwrap()), 2_000);
    }

    #[test]
    fn initial_failure_falls_back_to_disconnected() {
        let mut machine = ConnectionMachine::new(ReconnectPolicy::forever());
        machine.start().unwrap();
        let step = machine.failed("dns").unwrap();
        assert_eq!(step, NextStep::RetryAfter(Duration::ZERO));
        assert_eq!(machine.state(), ConnectionState::Disconnected);
        assert_eq!(machine.status().error.as_deref(), Some("dns"));
        machine.start().unwrap();
        assert_eq!(machine.state(), ConnectionState::Connecting);
    }

    #[test]
    fn unanswered_handshake_is_a_failed_attempt() {
        let mut machine = connected();
        machine.lost("drop").unwrap();
        let timeout = format!("no handshake answer after {HANDSHAKE_TIMEOUT:?}");
        assert_eq!(delay_ms(machine.failed(timeout).unwrap()), 2_000);
        assert_eq!(machine.state(), ConnectionState::Reconnecting);
        assert!(machine.error().is_some_and(|e| e.starts_with("no handshake")));
    }

    #[test]
    fn exhausted_policy_abandons_reconnection() {
        let mut machine = ConnectionMachine::new(ReconnectPolicy::with_max_attempts(1));
        machine.start().unwrap();
        machine.connected().unwrap();
        assert!(matches!(machine.lost("drop").unwrap(), NextStep::RetryAfter(_)));
        assert_eq!(machine.failed("refused").unwrap(), NextStep::GiveUp);
        assert_eq!(machine.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut machine = ConnectionMachine::new(ReconnectPolicy::forever());
        let err = machine.connected().unwrap_err();
        assert_eq!(err.from, ConnectionState::Disconnected);
        assert!(machine.lost("x").is_err());

        let mut machine = connected();
        assert!(machine.start().is_err());
        machine.close();
        assert_eq!(machine.status(), HubStatus::default());
    }
}
