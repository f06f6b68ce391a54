//! Mock transport for testing.
//!
//! Allows queueing response bodies and capturing issued requests for
//! verification.

use super::{Transport, TransportError, UploadForm};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method ("GET", "POST", "DELETE").
    pub method: &'static str,
    /// The endpoint path.
    pub path: String,
    /// The JSON body, if the request carried one.
    pub body: Option<serde_json::Value>,
    /// The multi-part form, if the request carried one.
    pub form: Option<UploadForm>,
}

/// Mock transport for testing.
///
/// Responses are served in FIFO order regardless of method; every request
/// is recorded. Clones share state, so a test can keep a handle while the
/// component under test owns another.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    requests: Vec<RecordedRequest>,
    responses: VecDeque<Vec<u8>>,
    fail_next: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw body to be returned by the next request.
    pub fn queue_response(&self, body: Vec<u8>) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(body);
    }

    /// Queue a JSON value to be returned by the next request.
    pub fn queue_json(&self, value: serde_json::Value) {
        self.queue_response(value.to_string().into_bytes());
    }

    /// Cause the next request to fail with the given reason.
    pub fn fail_next_request(&self, reason: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(reason.to_string());
    }

    /// All requests issued so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    fn record(&self, request: RecordedRequest) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        let path = request.path.clone();

        if let Some(reason) = inner.fail_next.take() {
            inner.requests.push(request);
            return Err(TransportError::Request { path, reason });
        }

        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .ok_or_else(|| TransportError::Request {
                path,
                reason: "no queued response".to_string(),
            })
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.record(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            body: None,
            form: None,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        self.record(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
            form: None,
        })
    }

    async fn delete_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        self.record(RecordedRequest {
            method: "DELETE",
            path: path.to_string(),
            body: Some(body.clone()),
            form: None,
        })
    }

    async fn post_form(&self, path: &str, form: UploadForm) -> Result<Vec<u8>, TransportError> {
        self.record(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            body: None,
            form: Some(form),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Attachment;

    #[tokio::test]
    async fn responses_are_served_in_order() {
        let transport = MockTransport::new();
        transport.queue_response(b"first".to_vec());
        transport.queue_response(b"second".to_vec());

        let r1 = transport.get("/a").await.unwrap();
        let r2 = transport.get("/b").await.unwrap();

        assert_eq!(r1, b"first");
        assert_eq!(r2, b"second");
    }

    #[tokio::test]
    async fn requests_are_recorded_with_bodies() {
        let transport = MockTransport::new();
        transport.queue_json(serde_json::json!([]));

        let body = serde_json::json!({ "count": 0 });
        transport
            .post_json("/messages/ten-last-messages/c1", &body)
            .await
            .unwrap();

        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.method, "POST");
        assert_eq!(recorded.path, "/messages/ten-last-messages/c1");
        assert_eq!(recorded.body, Some(body));
    }

    #[tokio::test]
    async fn forms_are_recorded() {
        let transport = MockTransport::new();
        transport.queue_json(serde_json::json!({}));

        let form = UploadForm::new()
            .text("senderID", "u1")
            .part("fileLink", Attachment::new("doc.pdf", vec![1, 2, 3]));
        transport.post_form("/messages", form.clone()).await.unwrap();

        assert_eq!(transport.last_request().unwrap().form, Some(form));
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let transport = MockTransport::new();
        let result = transport.get("/a").await;
        assert!(matches!(result, Err(TransportError::Request { .. })));
    }

    #[tokio::test]
    async fn forced_failure_consumes_one_request() {
        let transport = MockTransport::new();
        transport.fail_next_request("network unreachable");
        transport.queue_response(b"ok".to_vec());

        assert!(transport.get("/a").await.is_err());
        assert_eq!(transport.get("/b").await.unwrap(), b"ok");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let transport = MockTransport::new();
        let clone = transport.clone();
        clone.queue_response(b"ok".to_vec());

        transport.get("/a").await.unwrap();

        assert_eq!(clone.requests().len(), 1);
    }
}
