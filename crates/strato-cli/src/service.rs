use async_trait::async_trait;
use serde_json::Value;
use strato_engine::{ServiceClient, ServiceError};

/// Thin HTTP implementation of the service boundary. Transport only:
/// retries, throttling and authentication are not its concern.
pub struct HttpServiceClient {
    http: reqwest::Client,
}

impl HttpServiceClient {
    pub fn new() -> Self {
        HttpServiceClient {
            http: reqwest::Client::new(),
        }
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<Value, ServiceError> {
        let response = request
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|err| ServiceError::from_message(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ServiceError::from_message(err.to_string()))?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(ServiceError {
                status: Some(status.as_u16()),
                body,
            })
        }
    }
}

impl Default for HttpServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn get(&self, url: &str) -> std::result::Result<Value, ServiceError> {
        self.execute(self.http.get(url)).await
    }

    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
    ) -> std::result::Result<Value, ServiceError> {
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.execute(request).await
    }

    async fn delete(&self, url: &str) -> std::result::Result<Value, ServiceError> {
        self.execute(self.http.delete(url)).await
    }
}
