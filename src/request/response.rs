//! Response descriptors handed to the transport layer.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Outcome status, named after the HTTP statuses the transport renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "ok",
            Status::BadRequest => "bad_request",
            Status::Unauthorized => "unauthorized",
            Status::NotFound => "not_found",
            Status::InternalServerError => "internal_server_error",
        };
        f.write_str(name)
    }
}

/// A rendered `{status, body}` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: Status,
    pub body: Value,
}

impl Response {
    pub fn new(status: Status, body: impl Into<Value>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Value>) -> Self {
        Self::new(Status::Ok, body)
    }

    /// The body as a string, for error responses.
    pub fn message(&self) -> Option<&str> {
        self.body.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_displays_as_logged() {
        assert_eq!(Status::Ok.to_string(), "ok");
        assert_eq!(Status::BadRequest.to_string(), "bad_request");
        assert_eq!(Status::NotFound.to_string(), "not_found");

        for status in [
            Status::Ok,
            Status::BadRequest,
            Status::Unauthorized,
            Status::NotFound,
            Status::InternalServerError,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.to_string()));
        }
    }

    #[test]
    fn test_message_is_only_for_text_bodies() {
        let response = Response::new(Status::BadRequest, "Unknown API version: 3");
        assert_eq!(response.message(), Some("Unknown API version: 3"));
        assert_eq!(Response::ok(json!({ "id": 1 })).message(), None);
    }
}
