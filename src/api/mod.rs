//! Client for the remote responder.
//!
//! One request/response shape, one call per turn. Failures are translated
//! into [`ApiError`] so the UI can surface a single diagnostic line; the
//! transcript is never touched from here.

pub mod models;

use std::error::Error as StdError;
use std::fmt;

use tracing::debug;

use crate::core::constants::FALLBACK_REPLY;
use models::{ChatRequest, ChatResponse, ErrorBody};

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, broken pipe, ...).
    Transport(reqwest::Error),

    /// The responder answered with a non-success status. `detail` carries
    /// the responder's own diagnostic when the error body had one.
    Status { code: u16, detail: Option<String> },

    /// A 2xx response whose body could not be decoded as a chat response.
    Body(reqwest::Error),
}

impl ApiError {
    /// One-line diagnostic for the ephemeral error notice.
    pub fn diagnostic(&self) -> String {
        match self {
            ApiError::Transport(_) => "No se pudo conectar con el servidor".to_string(),
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { code, detail: None } => format!("HTTP error, status {code}"),
            ApiError::Body(_) => "Respuesta inválida del servidor".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(source) => write!(f, "transport error: {source}"),
            ApiError::Status { code, detail } => match detail {
                Some(detail) => write!(f, "status {code}: {detail}"),
                None => write!(f, "status {code}"),
            },
            ApiError::Body(source) => write!(f, "malformed response body: {source}"),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Transport(source) | ApiError::Body(source) => Some(source),
            ApiError::Status { .. } => None,
        }
    }
}

/// Send one user message and wait for the responder's reply. No timeout is
/// applied beyond what the transport itself enforces.
pub async fn send_message(
    client: &reqwest::Client,
    endpoint: &str,
    user_message: &str,
    session_id: &str,
) -> Result<String, ApiError> {
    let request = ChatRequest {
        user_message,
        session_id,
    };

    debug!(endpoint, session_id, "sending chat request");

    let response = client
        .post(endpoint)
        .json(&request)
        .send()
        .await
        .map_err(ApiError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        // The error body is best-effort; an unparsable one just means no
        // responder-supplied detail.
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .filter(|detail| !detail.is_empty());
        return Err(ApiError::Status {
            code: status.as_u16(),
            detail,
        });
    }

    let body = response.json::<ChatResponse>().await.map_err(ApiError::Body)?;
    Ok(reply_text(body))
}

/// Extract the reply text, substituting the fixed fallback when the payload
/// carries no usable text. An empty successful reply is deliberately
/// indistinguishable from a malformed one here; both read as the fallback.
pub fn reply_text(body: ChatResponse) -> String {
    match body.response {
        Some(text) if !text.is_empty() => text,
        _ => FALLBACK_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_passes_responder_text_through_verbatim() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"response":"Hola, ¿en qué puedo ayudarte?"}"#).unwrap();
        assert_eq!(reply_text(body), "Hola, ¿en qué puedo ayudarte?");
    }

    #[test]
    fn reply_text_falls_back_on_missing_field() {
        let body: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply_text(body), FALLBACK_REPLY);
    }

    #[test]
    fn reply_text_falls_back_on_empty_text() {
        let body: ChatResponse = serde_json::from_str(r#"{"response":""}"#).unwrap();
        assert_eq!(reply_text(body), FALLBACK_REPLY);
    }

    #[test]
    fn reply_text_falls_back_on_null_text() {
        let body: ChatResponse = serde_json::from_str(r#"{"response":null}"#).unwrap();
        assert_eq!(reply_text(body), FALLBACK_REPLY);
    }

    #[test]
    fn status_diagnostic_prefers_the_responder_detail() {
        let err = ApiError::Status {
            code: 500,
            detail: Some("server overloaded".to_string()),
        };
        assert_eq!(err.diagnostic(), "server overloaded");
    }

    #[test]
    fn status_diagnostic_without_detail_names_the_code() {
        let err = ApiError::Status {
            code: 502,
            detail: None,
        };
        assert_eq!(err.diagnostic(), "HTTP error, status 502");
    }
}
