use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a contract; also names the hub group its events go to.
///
/// The hub sends it either as a JSON number or as a numeric string, both are
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContractId(pub i64);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContractId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ContractId)
    }
}

impl<'de> Deserialize<'de> for ContractId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ContractId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// "Payment success" event pushed by the hub for one contract.
///
/// Only `contractId` is required. The optional fields are decoded leniently:
/// a value of an unexpected shape becomes `None` instead of rejecting the
/// whole event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub contract_id: ContractId,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub paid_at: Option<String>,
}

/// Accepts an integer, a decimal or a numeric string.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(amount.filter(|a| a.is_finite()))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn contract_id_accepts_number_and_string() {
        let a: PaymentSuccess =
            serde_json::from_str(r#"{"contractId":42,"message":"ok"}"#).unwrap();
        let b: PaymentSuccess =
            serde_json::from_str(r#"{"contractId":"42","message":"ok"}"#).unwrap();
        assert_eq!(a.contract_id, ContractId(42));
        assert_eq!(a, b);
        assert_eq!(a.amount, None);
    }

    #[rstest]
    #[case(r#"1500000.00"#, Some(1_500_000.0))]
    #[case(r#"1250.5"#, Some(1250.5))]
    #[case(r#"300"#, Some(300.0))]
    #[case(r#""1500000.00""#, Some(1_500_000.0))]
    #[case(r#""n/a""#, None)]
    #[case(r#"{"value":3}"#, None)]
    #[case(r#"null"#, None)]
    fn amount_is_decoded_leniently(#[case] raw: &str, #[case] expected: Option<f64>) {
        let json = format!(r#"{{"contractId":42,"message":"Pago recibido","amount":{raw}}}"#);
        let payment: PaymentSuccess = serde_json::from_str(&json).unwrap();
        assert_eq!(payment.contract_id, ContractId(42));
        assert_eq!(payment.amount, expected);
    }

    #[test]
    fn odd_paid_at_does_not_reject_the_event() {
        let payment: PaymentSuccess =
            serde_json::from_str(r#"{"contractId":7,"message":"ok","paidAt":1718000000}"#).unwrap();
        assert_eq!(payment.paid_at, None);
    }

    #[test]
    fn contract_id_rejects_garbage() {
        let res = serde_json::from_str::<PaymentSuccess>(r#"{"contractId":"abc"}"#);
        assert!(res.is_err());
    }
}
