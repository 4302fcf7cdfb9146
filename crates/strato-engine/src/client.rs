use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt;
use strato_types::Error;

/// A failed service call, carrying the raw response body so the error
/// message can be extracted from whatever envelope the service used.
#[derive(Debug)]
pub struct ServiceError {
    pub status: Option<u16>,
    pub body: Value,
}

impl ServiceError {
    /// A transport-level failure with no response body.
    pub fn from_message(message: impl Into<String>) -> Self {
        ServiceError {
            status: None,
            body: json!({ "error": { "message": message.into() } }),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", classify_error(&self.body).into_message())
    }
}

impl std::error::Error for ServiceError {}

/// The recognized error envelope shapes, tried in order. Replaces
/// ad hoc field probing with an explicit matcher chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorShape {
    /// OData-style envelope: `error["odata.error"].message.value`
    OData(String),
    /// Plain envelope: `error.message` or a top-level `message`
    Plain(String),
    /// Nothing recognizable; the raw body, stringified
    Unknown(String),
}

impl ErrorShape {
    pub fn into_message(self) -> String {
        match self {
            ErrorShape::OData(message)
            | ErrorShape::Plain(message)
            | ErrorShape::Unknown(message) => message,
        }
    }
}

pub fn classify_error(body: &Value) -> ErrorShape {
    if let Some(message) = body
        .pointer("/error/odata.error/message/value")
        .and_then(Value::as_str)
    {
        return ErrorShape::OData(message.to_string());
    }

    if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
        return ErrorShape::Plain(message.to_string());
    }

    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return ErrorShape::Plain(message.to_string());
    }

    if let Some(message) = body.as_str() {
        return ErrorShape::Plain(message.to_string());
    }

    ErrorShape::Unknown(body.to_string())
}

/// Translate a collaborator failure into the uniform command error,
/// keeping the most specific message the envelope carried.
pub fn command_error(err: ServiceError) -> Error {
    Error::Command(classify_error(&err.body).into_message())
}

/// The REST boundary consumed by command bodies. The engine itself
/// never calls it; transport, retries and authentication live behind
/// this trait.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<Value, ServiceError>;

    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
    ) -> std::result::Result<Value, ServiceError>;

    async fn delete(&self, url: &str) -> std::result::Result<Value, ServiceError>;
}

#[async_trait]
impl<T: ServiceClient + ?Sized> ServiceClient for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> std::result::Result<Value, ServiceError> {
        (**self).get(url).await
    }

    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
    ) -> std::result::Result<Value, ServiceError> {
        (**self).post(url, body).await
    }

    async fn delete(&self, url: &str) -> std::result::Result<Value, ServiceError> {
        (**self).delete(url).await
    }
}
