use serde::{Deserialize, Serialize};

/// Body of the outbound `POST` to the responder.
#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub user_message: &'a str,
    pub session_id: &'a str,
}

/// Successful response body. The `response` field may be absent or empty;
/// callers substitute the fallback reply in that case.
#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// Error body the responder attaches to non-2xx statuses.
#[derive(Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
