//! In-memory interceptor adapter.
//!
//! [`MockScope`] stands in for a mocking library: it holds registered
//! interceptions, matches dispatched requests against them and emits the
//! `request` / `replied` / `error` lifecycle events to subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use intercept_application::ports::{
    InterceptorError, InterceptorEvent, InterceptorHandle, RequestDescriptor, Subscription,
};
use intercept_domain::{DomainResult, Headers, HttpMethod, Interception};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};

const EVENT_CAPACITY: usize = 64;

/// A request sent to a [`MockScope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Request path, optionally with a query string.
    pub path: String,
    /// Request headers as sent.
    pub headers: Headers,
    /// Raw payload.
    pub body: Vec<u8>,
}

impl IncomingRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the request headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers.into_iter().collect();
        self
    }

    /// Sets a raw payload.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON payload and the matching `content-type` header.
    ///
    /// # Errors
    /// Returns a domain error only if the header name were invalid, which
    /// cannot happen for `content-type`.
    pub fn json(mut self, value: &Value) -> DomainResult<Self> {
        self.body = value.to_string().into_bytes();
        self.headers.insert("content-type", "application/json")?;
        Ok(self)
    }
}

#[derive(Debug)]
struct EventLog {
    history: Vec<InterceptorEvent>,
    sender: broadcast::Sender<InterceptorEvent>,
}

/// An in-memory mock endpoint for one host.
///
/// Every emitted event is also kept in a log. New subscriptions receive the
/// log as backlog, so an assertion made after the exchange finished sees the
/// same events as one made before it.
///
/// The log is never truncated and lives as long as the scope, so keep one
/// scope per test rather than reusing it across many exchanges.
#[derive(Debug, Clone)]
pub struct MockScope {
    host: String,
    interceptions: Vec<Interception>,
    log: Arc<Mutex<EventLog>>,
}

impl MockScope {
    /// Creates a scope for `host` with no interceptions.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            host: host.into(),
            interceptions: Vec::new(),
            log: Arc::new(Mutex::new(EventLog {
                history: Vec::new(),
                sender,
            })),
        }
    }

    /// Registers an interception for `method path`.
    ///
    /// # Errors
    /// Returns a domain error if `path` does not start with `/`.
    pub fn intercept(mut self, method: HttpMethod, path: impl Into<String>) -> DomainResult<Self> {
        let interception = Interception::new(method, self.host.clone(), path)?;
        debug!(host = %self.host, %method, path = %interception.path, "interception registered");
        self.interceptions.push(interception);
        Ok(self)
    }

    /// Host this scope intercepts.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sends a request through the scope.
    ///
    /// Header names are lowercased and a `host` header is added when
    /// missing. If an interception matches, `request` then `replied` are
    /// emitted and `true` is returned; otherwise nothing is emitted.
    ///
    /// # Errors
    /// Returns a domain error if the generated `host` header is rejected.
    pub fn dispatch(&self, request: IncomingRequest) -> DomainResult<bool> {
        let Some(interception) = self
            .interceptions
            .iter()
            .find(|i| i.matches(request.method, &request.path))
        else {
            debug!(method = %request.method, path = %request.path, "no interception matched");
            return Ok(false);
        };

        let mut headers = request.headers.to_lowercase_names();
        if !headers.contains("host") {
            headers.insert("host", self.host.clone())?;
        }
        let descriptor = RequestDescriptor {
            headers,
            interception: interception.clone(),
            body: request.body,
        };

        let mut log = self.lock();
        Self::record(&mut log, InterceptorEvent::Request(descriptor));
        Self::record(&mut log, InterceptorEvent::Replied);
        Ok(true)
    }

    /// Emits a raw `request` event.
    pub fn emit_request(&self, descriptor: RequestDescriptor) {
        Self::record(&mut self.lock(), InterceptorEvent::Request(descriptor));
    }

    /// Emits a raw `replied` event.
    pub fn emit_replied(&self) {
        Self::record(&mut self.lock(), InterceptorEvent::Replied);
    }

    /// Emits an `error` event.
    pub fn emit_error(&self, message: impl Into<String>) {
        Self::record(
            &mut self.lock(),
            InterceptorEvent::Error(InterceptorError::new(message)),
        );
    }

    /// Returns true once the scope has replied at least once.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.lock()
            .history
            .iter()
            .any(|event| matches!(event, InterceptorEvent::Replied))
    }

    fn lock(&self) -> MutexGuard<'_, EventLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(log: &mut EventLog, event: InterceptorEvent) {
        trace!(?event, "interceptor event");
        log.history.push(event.clone());
        // No live subscribers is fine, the event stays in the history.
        let _ = log.sender.send(event);
    }
}

impl InterceptorHandle for MockScope {
    fn interceptions(&self) -> &[Interception] {
        &self.interceptions
    }

    fn subscribe(&self) -> Subscription {
        let log = self.lock();
        Subscription::new(log.history.clone(), log.sender.subscribe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn scope() -> MockScope {
        MockScope::new("someurl.com")
            .intercept(HttpMethod::Get, "/")
            .unwrap()
    }

    #[test]
    fn test_new_scope_has_no_interceptions() {
        let scope = MockScope::new("url-without.a");
        assert!(scope.interceptions().is_empty());
        assert_eq!(scope.host(), "url-without.a");
    }

    #[test]
    fn test_intercept_rejects_relative_path() {
        assert!(MockScope::new("someurl.com").intercept(HttpMethod::Get, "nope").is_err());
    }

    #[tokio::test]
    async fn test_dispatch_emits_request_then_replied() {
        let scope = scope();
        let mut subscription = scope.subscribe();

        let request = IncomingRequest::new(HttpMethod::Get, "/")
            .headers([("Accept", "application/json")])
            .json(&json!({"test": 123}))
            .unwrap();
        assert!(scope.dispatch(request).unwrap());

        let InterceptorEvent::Request(descriptor) = subscription.recv().await.unwrap() else {
            panic!("expected a request event");
        };
        assert_eq!(descriptor.headers.get("accept"), Some("application/json"));
        assert_eq!(descriptor.headers.get("content-type"), Some("application/json"));
        assert_eq!(descriptor.headers.get("host"), Some("someurl.com"));
        assert_eq!(descriptor.body, br#"{"test":123}"#.to_vec());
        assert_eq!(descriptor.interception, scope.interceptions()[0]);
        assert_eq!(subscription.recv().await.unwrap(), InterceptorEvent::Replied);
        assert!(scope.is_done());
    }

    #[test]
    fn test_unmatched_dispatch_emits_nothing() {
        let scope = scope();
        assert!(!scope.dispatch(IncomingRequest::new(HttpMethod::Post, "/")).unwrap());
        assert!(!scope.dispatch(IncomingRequest::new(HttpMethod::Get, "/other")).unwrap());
        assert!(!scope.is_done());
    }

    #[tokio::test]
    async fn test_explicit_host_header_is_kept() {
        let scope = scope();
        let mut subscription = scope.subscribe();
        let request = IncomingRequest::new(HttpMethod::Get, "/").headers([("Host", "proxy.local")]);
        assert!(scope.dispatch(request).unwrap());

        let InterceptorEvent::Request(descriptor) = subscription.recv().await.unwrap() else {
            panic!("expected a request event");
        };
        assert_eq!(descriptor.headers.get("host"), Some("proxy.local"));
    }

    #[tokio::test]
    async fn test_late_subscription_replays_history() {
        let scope = scope();
        scope.emit_error("A problem");

        let mut subscription = scope.subscribe();
        assert_eq!(
            subscription.recv().await.unwrap(),
            InterceptorEvent::Error(InterceptorError::new("A problem"))
        );
    }
}
