//! Wire types for the gateway endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile document returned by `GET /user`.
///
/// The gateway answers anonymous requests with `error: true` and an otherwise
/// empty body. Fields beyond the ones named here are preserved verbatim so
/// the document round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Gateway error flag; cleared on a logged-in response.
    #[serde(default = "error_flag_default")]
    pub error: bool,

    /// Identity-provider username. Present only when logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Generated kubeconfig for the user's namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Remaining profile fields, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A payload without the flag does not count as a logged-in response.
fn error_flag_default() -> bool {
    true
}

impl UserDocument {
    /// Decision rule of the gateway front-end: a response is a logged-in
    /// profile only when the error flag is cleared and a name is present.
    pub fn is_logged_in(&self) -> bool {
        !self.error && self.name.is_some()
    }

    /// Username for display.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unknown)")
    }
}

/// Response body of `GET /logout`.
///
/// Anything but `ok: true` leaves the local session untouched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_in_payload() {
        let doc: UserDocument = serde_json::from_str(
            r#"{"error": false, "name": "Alice", "kubeconfig": "apiVersion: v1..."}"#,
        )
        .unwrap();
        assert!(doc.is_logged_in());
        assert_eq!(doc.display_name(), "Alice");
        assert_eq!(doc.kubeconfig.as_deref(), Some("apiVersion: v1..."));
    }

    #[test]
    fn test_error_flag_means_anonymous() {
        let doc: UserDocument = serde_json::from_str(r#"{"error": true}"#).unwrap();
        assert!(!doc.is_logged_in());
    }

    #[test]
    fn test_missing_name_means_anonymous() {
        let doc: UserDocument = serde_json::from_str(r#"{"error": false}"#).unwrap();
        assert!(!doc.is_logged_in());
    }

    #[test]
    fn test_missing_error_flag_means_anonymous() {
        let doc: UserDocument = serde_json::from_str(r#"{"name": "Alice"}"#).unwrap();
        assert!(!doc.is_logged_in());
    }

    #[test]
    fn test_extra_fields_preserved() {
        let doc: UserDocument = serde_json::from_str(
            r#"{"error": false, "name": "Alice", "playlist": "warmup"}"#,
        )
        .unwrap();
        assert_eq!(
            doc.extra.get("playlist").and_then(|v| v.as_str()),
            Some("warmup")
        );

        let round_trip = serde_json::to_value(&doc).unwrap();
        assert_eq!(round_trip["playlist"], "warmup");
    }

    #[test]
    fn test_logout_ok_defaults_to_false() {
        let resp: LogoutResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.ok);
    }
}
