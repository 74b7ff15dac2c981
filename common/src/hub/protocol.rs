//! JSON hub protocol as spoken over a WebSocket.
//!
//! Every message is a JSON object followed by the record separator `0x1E`.
//! A connection opens with a handshake (`{"protocol":"json","version":1}`),
//! answered by `{}` or `{"error": "..."}`; after that messages are told apart
//! by their numeric `type`:
//!
//! | type | meaning                               |
//! |------|---------------------------------------|
//! | 1    | invocation (`target`, `arguments`)    |
//! | 3    | completion of a client invocation     |
//! | 6    | ping                                  |
//! | 7    | close (`error`, `allowReconnect`)     |
//!
//! Only the pieces the payment subscription needs are modelled; anything else
//! decodes to [`HubMessage::Other`] and is ignored.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::payment::{ContractId, PaymentSuccess};

pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Server event carrying a [`PaymentSuccess`].
pub const PAYMENT_SUCCESS_TARGET: &str = "PaymentSuccess";

/// How long the server may take to answer the handshake before the attempt
/// counts as failed.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum HubError {
    #[error("invalid hub message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hub refused the handshake: {0}")]
    Handshake(String),

    #[error("hub message without a type")]
    MissingType,

    #[error("malformed {target} event: {reason}")]
    MalformedEvent { target: String, reason: String },
}

/// Client to server calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubInvocation {
    JoinContractGroup(ContractId),
    LeaveContractGroup(ContractId),
}

impl HubInvocation {
    pub fn target(&self) -> &'static str {
        match self {
            HubInvocation::JoinContractGroup(_) => "JoinContractGroup",
            HubInvocation::LeaveContractGroup(_) => "LeaveContractGroup",
        }
    }

    /// Fire-and-forget invocation frame (no `invocationId`, so the server
    /// sends no completion). The contract id travels as a string.
    pub fn encode(&self) -> String {
        let (HubInvocation::JoinContractGroup(id) | HubInvocation::LeaveContractGroup(id)) = self;
        frame(&json!({
            "type": 1,
            "target": self.target(),
            "arguments": [id.to_string()],
        }))
    }
}

/// Server to client messages.
#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    Invocation { target: String, arguments: Vec<Value> },
    Completion { error: Option<String> },
    Ping,
    Close { error: Option<String>, allow_reconnect: bool },
    Other(u64),
}

impl HubMessage {
    /// The payment carried by this message, if it is a payment event.
    pub fn payment(&self) -> Result<Option<PaymentSuccess>, HubError> {
        let HubMessage::Invocation { target, arguments } = self else {
            return Ok(None);
        };
        if target != PAYMENT_SUCCESS_TARGET {
            return Ok(None);
        }
        let malformed = |reason: String| HubError::MalformedEvent {
            target: target.clone(),
            reason,
        };
        let first = arguments
            .first()
            .ok_or_else(|| malformed("no arguments".to_string()))?;
        PaymentSuccess::deserialize(first)
            .map(Some)
            .map_err(|e| malformed(e.to_string()))
    }
}

pub fn handshake_request() -> String {
    frame(&json!({ "protocol": "json", "version": 1 }))
}

fn frame(value: &Value) -> String {
    let mut out = value.to_string();
    out.push(RECORD_SEPARATOR);
    out
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    #[serde(rename = "type")]
    kind: Option<u64>,
    target: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    error: Option<String>,
    #[serde(default)]
    allow_reconnect: bool,
}

/// Decodes one frame (separator already stripped).
pub fn decode(frame: &str) -> Result<HubMessage, HubError> {
    let raw: RawMessage = serde_json::from_str(frame)?;
    let message = match raw.kind.ok_or(HubError::MissingType)? {
        1 => HubMessage::Invocation {
            target: raw.target.unwrap_or_default(),
            arguments: raw.arguments,
        },
        3 => HubMessage::Completion { error: raw.error },
        6 => HubMessage::Ping,
        7 => HubMessage::Close {
            error: raw.error,
            allow_reconnect: raw.allow_reconnect,
        },
        other => HubMessage::Other(other),
    };
    Ok(message)
}

/// Reassembles frames from WebSocket text messages.
///
/// A message may hold several frames, or end in the middle of one; the
/// incomplete tail is kept until the next message. The first frame of a
/// connection is the handshake answer.
#[derive(Debug, Default)]
pub struct FrameReader {
    pending: String,
    handshake_done: bool,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }

    pub fn feed(&mut self, text: &str) -> Result<Vec<HubMessage>, HubError> {
        self.pending.push_str(text);
        let Some(last) = self.pending.rfind(RECORD_SEPARATOR) else {
            return Ok(Vec::new());
        };
        let complete: String = self.pending.drain(..=last).collect();

        let mut messages = Vec::new();
        for frame in complete.split(RECORD_SEPARATOR).filter(|f| !f.is_empty()) {
            if self.handshake_done {
                messages.push(decode(frame)?);
            } else {
                check_handshake(frame)?;
                self.handshake_done = true;
            }
        }
        Ok(messages)
    }
}

fn check_handshake(frame: &str) -> Result<(), HubError> {
    #[derive(Deserialize)]
    struct HandshakeResponse {
        error: Option<String>,
    }

    let response: HandshakeResponse = serde_json::from_str(frame)?;
    match response.error {
        Some(error) => Err(HubError::Handshake(error)),
        None => Ok(()),
    }
}

/// Maps an `http(s)://` hub address to the matching `ws(s)://` one.
pub fn websocket_url(hub_url: &str) -> String {
    if let Some(rest) = hub_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = hub_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        hub_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn invocation_frames() {
        let join = HubInvocation::JoinContractGroup(ContractId(42)).encode();
        assert!(join.ends_with(RECORD_SEPARATOR));
        let value: Value = serde_json::from_str(join.trim_end_matches(RECORD_SEPARATOR)).unwrap();
        assert_eq!(
            value,
            json!({"type": 1, "target": "JoinContractGroup", "arguments": ["42"]})
        );
        assert_eq!(
            HubInvocation::LeaveContractGroup(ContractId(7)).target(),
            "LeaveContractGroup"
        );
    }

    #[test]
    fn handshake_request_is_framed() {
        assert_eq!(
            handshake_request(),
            "{\"protocol\":\"json\",\"version\":1}\u{1e}"
        );
    }

    #[test]
    fn reader_consumes_handshake_then_messages() {
        let mut reader = FrameReader::new();
        let msgs = reader.feed("{}\u{1e}{\"type\":6}\u{1e}").unwrap();
        assert!(reader.handshake_done());
        assert_eq!(msgs, vec![HubMessage::Ping]);
    }

    #[test]
    fn reader_keeps_partial_frames() {
        let mut reader = FrameReader::new();
        reader.feed("{}\u{1e}").unwrap();
        assert!(reader.feed("{\"type\":1,\"target\":\"Payment").unwrap().is_empty());
        let msgs = reader
            .feed("Success\",\"arguments\":[{\"contractId\":42,\"message\":\"ok\"}]}\u{1e}")
            .unwrap();
        let payment = msgs[0].payment().unwrap().unwrap();
        assert_eq!(payment.contract_id, ContractId(42));
        assert_eq!(payment.message, "ok");
    }

    #[test]
    fn refused_handshake_is_an_error() {
        let mut reader = FrameReader::new();
        let err = reader
            .feed("{\"error\":\"Requested protocol 'json' is not available.\"}\u{1e}")
            .unwrap_err();
        assert!(matches!(err, HubError::Handshake(_)));
    }

    #[test]
    fn close_message_carries_reconnect_hint() {
        let msg =
            decode(r#"{"type":7,"error":"Server shutting down","allowReconnect":true}"#).unwrap();
        assert_eq!(
            msg,
            HubMessage::Close {
                error: Some("Server shutting down".into()),
                allow_reconnect: true
            }
        );
    }

    #[test]
    fn unknown_types_and_targets_are_ignored() {
        assert_eq!(decode(r#"{"type":2,"item":1}"#).unwrap(), HubMessage::Other(2));
        let other = decode(r#"{"type":1,"target":"UnreadCount","arguments":[3]}"#).unwrap();
        assert_eq!(other.payment().unwrap(), None);
        assert!(matches!(decode("{}"), Err(HubError::MissingType)));
    }

    #[test]
    fn payment_with_decimal_amount_is_delivered() {
        let msg = decode(
            r#"{"type":1,"target":"PaymentSuccess","arguments":[{"contractId":42,"message":"Pago recibido","amount":1500000.00}]}"#,
        )
        .unwrap();
        let payment = msg.payment().unwrap().unwrap();
        assert_eq!(payment.contract_id, ContractId(42));
        assert_eq!(payment.amount, Some(1_500_000.0));
    }

    #[test]
    fn payment_with_unreadable_amount_is_still_delivered() {
        let msg = decode(
            r#"{"type":1,"target":"PaymentSuccess","arguments":[{"contractId":"42","message":"ok","amount":"pendiente"}]}"#,
        )
        .unwrap();
        let payment = msg.payment().unwrap().unwrap();
        assert_eq!(payment.contract_id, ContractId(42));
        assert_eq!(payment.amount, None);
    }

    #[test]
    fn payment_event_without_argument_is_malformed() {
        let msg = decode(r#"{"type":1,"target":"PaymentSuccess","arguments":[]}"#).unwrap();
        assert!(matches!(msg.payment(), Err(HubError::MalformedEvent { .. })));
    }

    #[rstest]
    #[case("https://erp.example.com/hubs/payment", "wss://erp.example.com/hubs/payment")]
    #[case("http://localhost:5000/hubs/payment", "ws://localhost:5000/hubs/payment")]
    #[case("wss://already/ws", "wss://already/ws")]
    fn websocket_scheme(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(websocket_url(input), expected);
    }
}
