use reqwest::StatusCode;
use thiserror::Error;

/// Longest backend error body kept in an [`ApiError::Status`]
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Credentials rejected and could not be refreshed
    #[error("not authorized")]
    Unauthorized,

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn status(status: StatusCode, body: String) -> Self {
        let body = if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body
        };
        ApiError::Status { status, body }
    }

    /// Returns a user-facing message without backend internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Transport(e) if e.is_timeout() => "The server took too long to respond",
            ApiError::Transport(_) => "Could not reach the server",
            ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND => "Not found",
            ApiError::Status { status, .. } if status.is_client_error() => {
                "The request was rejected"
            }
            ApiError::Status { .. } => "The server reported an error",
            ApiError::Unauthorized => "Please log in again",
            ApiError::Decode(_) => "Unexpected response from the server",
        }
    }

    /// Human readable `detail` from a rejected request, if the backend sent one.
    ///
    /// Validation failures carry a list of `{msg}` objects, which are joined.
    pub fn detail(&self) -> Option<String> {
        let ApiError::Status { status, body } = self else {
            return None;
        };
        if !status.is_client_error() {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(detail) => Some(detail.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").or_else(|| item.get("message")))
                    .filter_map(|msg| msg.as_str())
                    .collect();
                (!messages.is_empty()).then(|| messages.join(", "))
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_body_is_truncated() {
        let err = ApiError::status(StatusCode::BAD_GATEWAY, "é".repeat(400));
        match err {
            ApiError::Status { body, .. } => {
                assert!(body.ends_with("..."));
                assert!(body.len() <= MAX_ERROR_BODY + 3);
            }
            _ => panic!("Expected Status variant"),
        }
    }

    #[test]
    fn test_detail_from_rejected_request() {
        let taken = ApiError::status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Email already registered"}"#.to_string(),
        );
        assert_eq!(taken.detail().as_deref(), Some("Email already registered"));

        let invalid = ApiError::status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "value is not a valid email"}, {"msg": "field required"}]}"#.to_string(),
        );
        assert_eq!(
            invalid.detail().as_deref(),
            Some("value is not a valid email, field required")
        );

        let server = ApiError::status(StatusCode::BAD_GATEWAY, r#"{"detail": "upstream"}"#.to_string());
        assert_eq!(server.detail(), None);
        assert_eq!(ApiError::status(StatusCode::BAD_REQUEST, "oops".to_string()).detail(), None);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ApiError::Unauthorized.user_message(), "Please log in again");
        let not_found = ApiError::status(StatusCode::NOT_FOUND, String::new());
        assert!(not_found.is_not_found());
        assert_eq!(not_found.user_message(), "Not found");
        assert_eq!(
            ApiError::status(StatusCode::UNPROCESSABLE_ENTITY, String::new()).user_message(),
            "The request was rejected"
        );
    }
}
