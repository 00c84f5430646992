//! `MockHttpHelper`: a test double for `HttpHelper`.
//!
//! Useful in unit and integration tests where nodes must be driven without a
//! network.  Responses are replayed in the order they were scripted and every
//! request the node issues is recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::http::{HttpError, HttpHelper, HttpRequestOptions};

/// A scripted helper that records every call it receives.
#[derive(Default)]
pub struct MockHttpHelper {
    responses: Mutex<VecDeque<Result<Value, HttpError>>>,
    /// All requests seen by this helper (in call order).
    pub calls: Arc<Mutex<Vec<HttpRequestOptions>>>,
}

impl MockHttpHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn respond_with(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    /// Queue a failure.
    pub fn fail_with(self, error: HttpError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of requests issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of the recorded requests.
    pub fn recorded(&self) -> Vec<HttpRequestOptions> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpHelper for MockHttpHelper {
    async fn request(&self, options: HttpRequestOptions) -> Result<Value, HttpError> {
        let url = options.url.clone();
        self.calls.lock().unwrap().push(options);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError::Transport {
                    url,
                    message: "no scripted response left".into(),
                })
            })
    }
}
