//! Credential blob decoding and the authorization capability.
//!
//! Decoding answers "is the blob well-formed"; the
//! [`CredentialValidator`] answers "is this identity allowed". The two
//! are deliberately separate so real credential checking can be plugged
//! in without touching the session state machine.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::ClientIdentity;
use crate::error::SessionError;

/// Decodes an `authString` blob into the identity it claims.
///
/// The blob is base64 over a JSON object with `appID` and `flightID`
/// fields.
///
/// # Errors
///
/// Returns [`SessionError::AuthDecode`] if the base64 or the inner JSON
/// is invalid.
pub fn decode_auth_string(auth_string: &str) -> Result<ClientIdentity, SessionError> {
    let bytes = STANDARD
        .decode(auth_string)
        .map_err(|e| SessionError::AuthDecode(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::AuthDecode(format!("invalid credential JSON: {e}")))
}

/// Decides whether a decoded identity may ingest data.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Returns `true` if the identity is authorized.
    async fn validate(&self, identity: &ClientIdentity) -> bool;
}

/// Validator that accepts every well-formed identity.
///
/// Stands in for a real authorization service; the handshake still
/// rejects blobs that do not decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl CredentialValidator for AllowAll {
    async fn validate(&self, _identity: &ClientIdentity) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn decodes_round_trip() {
        let blob = encode(r#"{"appID": "A1", "flightID": "F1"}"#);
        let identity = decode_auth_string(&blob).unwrap();
        assert_eq!(identity, ClientIdentity::new("A1", "F1"));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_auth_string("not*base64!").unwrap_err();
        assert!(matches!(err, SessionError::AuthDecode(_)));
    }

    #[test]
    fn rejects_non_json_payload() {
        let err = decode_auth_string(&encode("hello there")).unwrap_err();
        assert!(matches!(err, SessionError::AuthDecode(_)));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = decode_auth_string(&encode(r#"{"appID": "A1"}"#)).unwrap_err();
        assert!(matches!(err, SessionError::AuthDecode(_)));
    }

    #[tokio::test]
    async fn allow_all_accepts() {
        let identity = ClientIdentity::new("A1", "F1");
        assert!(AllowAll.validate(&identity).await);
    }
}
