//! Wire types of the source query.
//!
//! Every response that reaches the route carries a JSON body: either
//! `{"content": ...}` or `{"error": ...}`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query string of `GET <route>?id=<identifier>`.
///
/// `path` is the older name of the parameter and is still accepted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SourceQuery {
    pub id: Option<String>,
    pub path: Option<String>,
}

impl SourceQuery {
    /// Requested identifier, empty when neither parameter was given
    pub fn identifier(self) -> String {
        self.id.or(self.path).unwrap_or_default()
    }
}

/// JSON body of every source query response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryBody {
    Content { content: String },
    Error { error: String },
}

/// Status plus body of one source query answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceResponse {
    pub status: u16,
    pub body: QueryBody,
}

impl SourceResponse {
    pub fn content(text: &str) -> Self {
        Self {
            status: 200,
            body: QueryBody::Content {
                content: text.to_string(),
            },
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: QueryBody::Error {
                error: message.into(),
            },
        }
    }
}

impl IntoResponse for SourceResponse {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_prefers_id_over_path() {
        let query = SourceQuery {
            id: Some("a.ts".to_string()),
            path: Some("b.ts".to_string()),
        };
        assert_eq!(query.identifier(), "a.ts");

        let legacy = SourceQuery {
            id: None,
            path: Some("b.ts".to_string()),
        };
        assert_eq!(legacy.identifier(), "b.ts");

        assert_eq!(SourceQuery::default().identifier(), "");
    }

    #[test]
    fn test_error_response_status() {
        let response = SourceResponse::error(403, "Access denied").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = SourceResponse::content("x").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
