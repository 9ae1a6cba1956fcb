use serde::{Deserialize, Serialize};

use crate::domain::user::Capabilities;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
    pub created_at: String,
    #[serde(rename = "user")]
    pub author: String,
}

/// Body of `POST /api/tickets/{id}/responses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDraft {
    pub message: String,
    pub is_internal: bool,
}

impl ResponseDraft {
    pub fn public(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_internal: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_internal: true,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty()
    }
}

/// Responses a viewer with `caps` is allowed to see, in thread order.
pub fn visible_responses(
    responses: &[Response],
    caps: Capabilities,
) -> impl Iterator<Item = &Response> {
    responses
        .iter()
        .filter(move |response| !response.is_internal || caps.can_view_internal)
}
