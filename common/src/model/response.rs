use serde::{Deserialize, Serialize};

/// Envelope wrapped around every REST payload.
///
/// `success = false` means the server refused the operation; `message` then
/// explains why and `data` is usually absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "assume_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

fn assume_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Returns the payload, or the server message when the call was refused
    /// or carried no data.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(self
                .message
                .unwrap_or_else(|| "respuesta sin datos".to_string())),
            (false, _) => Err(self
                .message
                .unwrap_or_else(|| "operación rechazada".to_string())),
        }
    }

    /// For calls whose payload is irrelevant (delete, set default).
    pub fn into_ack(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self
                .message
                .unwrap_or_else(|| "operación rechazada".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_call_surfaces_message() {
        let resp: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"success":false,"message":"Código duplicado"}"#).unwrap();
        assert_eq!(resp.into_result(), Err("Código duplicado".to_string()));
    }

    #[test]
    fn ack_ignores_missing_data() {
        let resp: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(resp.into_ack(), Ok(()));
    }

    #[test]
    fn data_is_unwrapped() {
        let resp: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"success":true,"data":["A","B"]}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), vec!["A", "B"]);
    }
}
