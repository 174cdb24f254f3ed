//! Clickthrough tokens: the opaque attribution blob a tracked link carries.
//!
//! A token is url-safe base64 over a small JSON payload. Tokens arrive from
//! the outside world, so decoding failures are expected and must stay soft:
//! callers skip attribution and carry on with the primary response.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Attribution carried by a clickthrough token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clickthrough {
    /// The contact the click is attributed to.
    #[serde(default)]
    pub contact: Option<u64>,

    /// The channel the link was delivered through (e.g. `email`).
    #[serde(default)]
    pub channel: Option<String>,

    /// The identifier of the sending entity within the channel.
    #[serde(default)]
    pub source: Option<String>,

    /// The stat record that produced the link, for send-level attribution.
    #[serde(default)]
    pub stat: Option<String>,
}

/// Errors arising from a malformed clickthrough token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is not valid url-safe base64.
    #[error("clickthrough token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded payload is not the expected JSON shape.
    #[error("clickthrough token payload is not valid: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encodes a clickthrough for embedding in a URL.
pub fn encode(clickthrough: &Clickthrough) -> String {
    let payload = serde_json::to_vec(clickthrough)
        .expect("clickthrough serialization cannot fail");
    URL_SAFE_NO_PAD.encode(payload)
}

/// Decodes a clickthrough token received from a request.
pub fn decode(token: &str) -> Result<Clickthrough, TokenError> {
    let payload = URL_SAFE_NO_PAD.decode(token.trim())?;
    Ok(serde_json::from_slice(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let clickthrough = Clickthrough {
            contact: Some(42),
            channel: Some("email".to_string()),
            source: Some("17".to_string()),
            stat: None,
        };

        let token = encode(&clickthrough);
        assert_eq!(decode(&token).unwrap(), clickthrough);
    }

    #[test]
    fn test_garbage_is_an_encoding_error() {
        let result = decode("!!not-base64!!");
        assert!(matches!(result, Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_wrong_payload_is_a_payload_error() {
        let token = URL_SAFE_NO_PAD.encode(b"[1, 2, 3]");
        let result = decode(&token);
        assert!(matches!(result, Err(TokenError::Payload(_))));
    }

    #[test]
    fn test_empty_payload_decodes_to_defaults() {
        let token = URL_SAFE_NO_PAD.encode(b"{}");
        assert_eq!(decode(&token).unwrap(), Clickthrough::default());
    }
}
