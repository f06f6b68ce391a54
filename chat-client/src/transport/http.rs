//! reqwest-backed transport.

use super::{Transport, TransportError, UploadForm};
use crate::config::TransportConfig;
use async_trait::async_trait;

/// HTTP transport over a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: TransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn read_body(
        path: &str,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }

    fn request_error(path: &str, error: reqwest::Error) -> TransportError {
        TransportError::Request {
            path: path.to_string(),
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| Self::request_error(path, e))?;
        Self::read_body(path, response).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Self::request_error(path, e))?;
        Self::read_body(path, response).await
    }

    async fn delete_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| Self::request_error(path, e))?;
        Self::read_body(path, response).await
    }

    async fn post_form(&self, path: &str, form: UploadForm) -> Result<Vec<u8>, TransportError> {
        let (fields, parts) = form.into_parts();
        let mut multipart = reqwest::multipart::Form::new();
        for (name, value) in fields {
            multipart = multipart.text(name, value);
        }
        for (field, attachment) in parts {
            let part =
                reqwest::multipart::Part::bytes(attachment.bytes).file_name(attachment.file_name);
            multipart = multipart.part(field, part);
        }
        let response = self
            .client
            .post(self.url(path))
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| Self::request_error(path, e))?;
        Self::read_body(path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let transport = HttpTransport::new(TransportConfig::new("https://api.example/")).unwrap();
        assert_eq!(
            transport.url("/messages/recall/m1"),
            "https://api.example/messages/recall/m1"
        );
    }
}
