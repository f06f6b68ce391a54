//! Transport abstraction for the messages API.
//!
//! This module provides a pluggable transport layer over the backend's
//! request/response HTTP operations, including multi-part uploads.
//!
//! # Design
//!
//! The trait is deliberately thin: callers build endpoint paths and JSON
//! bodies, the transport moves bytes. All methods return the raw response
//! body; decoding into typed records happens in the components, which keeps
//! the trait object-safe and the mock trivial.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.queue_json(serde_json::json!([]));
//! let bytes = transport.post_json("/messages/ten-last-messages/c1", &body).await?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be performed (connection, timeout, body read).
    #[error("request to {path} failed: {reason}")]
    Request {
        /// The endpoint path that was requested.
        path: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {path}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The endpoint path that was requested.
        path: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// A file staged for a multi-part upload: local file name plus content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name reported to the server.
    pub file_name: String,
    /// File content.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create an attachment from a file name and its content.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// A transport-neutral description of a multi-part form.
///
/// [`HttpTransport`] converts this into a real multipart body;
/// [`MockTransport`] records it for assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    fields: Vec<(String, String)>,
    parts: Vec<(String, Attachment)>,
}

impl UploadForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Add an attachment under the given field name.
    pub fn part(mut self, field: &str, attachment: Attachment) -> Self {
        self.parts.push((field.to_string(), attachment));
        self
    }

    /// The text fields, in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// The attachments, in insertion order.
    pub fn parts(&self) -> &[(String, Attachment)] {
        &self.parts
    }

    /// Consume the form into its fields and attachments.
    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<(String, Attachment)>) {
        (self.fields, self.parts)
    }
}

/// Transport trait for the backend's messages API.
///
/// Implementations handle the underlying HTTP mechanism (reqwest, mock).
/// All methods return the raw response body bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// Perform a POST request with a JSON body.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError>;

    /// Perform a DELETE request with a JSON body.
    async fn delete_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError>;

    /// Perform a POST request with a multi-part form body.
    async fn post_form(&self, path: &str, form: UploadForm) -> Result<Vec<u8>, TransportError>;
}
