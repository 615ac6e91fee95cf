use serde_json::Value;
use std::fmt;

/// HTTP-style status codes the API answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    InternalError,
    ServiceUnavailable,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::PayloadTooLarge => 413,
            StatusCode::InternalError => 500,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::InternalError => "Internal Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

impl From<StatusCode> for hyper::StatusCode {
    fn from(status: StatusCode) -> Self {
        hyper::StatusCode::from_u16(status.code()).unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Rendered as `{ "data": ... }`.
    Data(Value),
    /// Rendered as `{ "error": ... }`.
    Error(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl Response {
    pub fn ok_json(data: Value) -> Self {
        Self {
            status: StatusCode::Ok,
            body: ResponseBody::Data(data),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NoContent,
            body: ResponseBody::Empty,
        }
    }

    pub fn error(code: StatusCode, message: impl ToString) -> Self {
        Self {
            status: code,
            body: ResponseBody::Error(message.to_string()),
        }
    }

    /// The `data` payload, if this is a success response carrying one.
    pub fn data(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Data(value) => Some(value),
            _ => None,
        }
    }
}
