//! Mock API gateway for testing.
//!
//! Provides a scripted implementation of `ApiGateway` for unit and
//! integration tests. Supports:
//! - One-shot responses per `(method, path)`, consumed in order
//! - Sticky fallback responses
//! - Error injection (API rejection or unreachable server)
//! - Call tracking

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{
    ApiError, ApiGateway, ConnectionError, GatewayError, HttpMethod, MultipartForm,
};

/// A scripted gateway result.
pub type Scripted = Result<Option<Value>, GatewayError>;

/// Mock gateway for testing.
///
/// # Example
///
/// ```ignore
/// let gateway = MockGateway::new();
/// gateway.respond(HttpMethod::Get, "/api/users/me/", MockGateway::ok(json!({...})));
/// gateway.respond_always(HttpMethod::Get, "/api/orders/7/", MockGateway::ok(order));
///
/// // ... exercise the store ...
///
/// assert_eq!(gateway.call_count(), 2);
/// ```
#[derive(Default)]
pub struct MockGateway {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    queued: HashMap<(HttpMethod, String), VecDeque<Scripted>>,
    sticky: HashMap<(HttpMethod, String), Scripted>,
    calls: Vec<RecordedCall>,
}

/// Recorded call for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
    pub form: Option<MultipartForm>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response builders
    // ════════════════════════════════════════════════════════════════════════════

    pub fn ok(value: Value) -> Scripted {
        Ok(Some(value))
    }

    pub fn no_content() -> Scripted {
        Ok(None)
    }

    pub fn api_error(status: u16, detail: Value) -> Scripted {
        Err(ApiError::new(status, detail).into())
    }

    pub fn unreachable(method: HttpMethod, path: &str) -> Scripted {
        Err(ConnectionError {
            method,
            path: path.to_string(),
            message: "connection refused".to_string(),
        }
        .into())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    /// Queue a response for the next matching call.
    pub fn respond(&self, method: HttpMethod, path: &str, response: Scripted) {
        self.state()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Response used whenever the queue for `(method, path)` is empty.
    pub fn respond_always(&self, method: HttpMethod, path: &str, response: Scripted) {
        self.state().sticky.insert((method, path.to_string()), response);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> Vec<RecordedCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .cloned()
            .collect()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state().calls.last().cloned()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().expect("MockGateway: state lock poisoned")
    }

    fn next_response(&self, call: RecordedCall) -> Scripted {
        let mut state = self.state();
        let key = (call.method, call.path.clone());
        state.calls.push(call);
        if let Some(response) = state.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return response;
        }
        state.sticky.get(&key).cloned().unwrap_or_else(|| {
            Err(ApiError::new(404, serde_json::json!({"detail": "Not found."})).into())
        })
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Option<Value>, GatewayError> {
        self.next_response(RecordedCall {
            method,
            path: path.to_string(),
            body,
            token: token.map(str::to_string),
            form: None,
        })
    }

    async fn request_with_file(
        &self,
        method: HttpMethod,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.next_response(RecordedCall {
            method,
            path: path.to_string(),
            body: None,
            token: token.map(str::to_string),
            form: Some(form),
        })
        .map(|v| v.unwrap_or(Value::Null))
    }
}
