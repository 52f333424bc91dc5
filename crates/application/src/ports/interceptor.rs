//! Interceptor port

use std::collections::VecDeque;

use intercept_domain::{Headers, Interception};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};

/// An error reported by the mocking library through the `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InterceptorError(pub String);

impl InterceptorError {
    /// Creates an error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A request as reported by the `request` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Request headers.
    pub headers: Headers,
    /// The interception the request matched.
    pub interception: Interception,
    /// Raw transmitted payload.
    pub body: Vec<u8>,
}

/// Lifecycle events an interceptor emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptorEvent {
    /// A request hit the interceptor.
    Request(RequestDescriptor),
    /// The interceptor finished replying.
    Replied,
    /// The interceptor failed.
    Error(InterceptorError),
}

/// Port for a registered mock endpoint.
///
/// The handle is owned by the mocking library; assertions only borrow it to
/// check its interceptions and to subscribe to its events.
pub trait InterceptorHandle: Send + Sync {
    /// Interceptions registered on this handle, in registration order.
    fn interceptions(&self) -> &[Interception];

    /// Subscribes to lifecycle events.
    ///
    /// The returned subscription sees every event dispatched after this call.
    /// Adapters that remember past events may hand them out as backlog.
    fn subscribe(&self) -> Subscription;
}

/// A stream of interceptor events: a backlog of past events followed by live ones.
#[derive(Debug)]
pub struct Subscription {
    backlog: VecDeque<InterceptorEvent>,
    live: broadcast::Receiver<InterceptorEvent>,
}

impl Subscription {
    /// Creates a subscription replaying `backlog` before live events.
    #[must_use]
    pub fn new(
        backlog: impl IntoIterator<Item = InterceptorEvent>,
        live: broadcast::Receiver<InterceptorEvent>,
    ) -> Self {
        Self {
            backlog: backlog.into_iter().collect(),
            live,
        }
    }

    /// Creates a subscription with live events only.
    #[must_use]
    pub fn live(live: broadcast::Receiver<InterceptorEvent>) -> Self {
        Self::new([], live)
    }

    /// Receives the next event.
    ///
    /// # Errors
    /// Returns [`RecvError::Lagged`] when live events were dropped because
    /// this subscription fell behind, and [`RecvError::Closed`] once the
    /// interceptor is gone and the backlog is drained.
    pub async fn recv(&mut self) -> Result<InterceptorEvent, RecvError> {
        if let Some(event) = self.backlog.pop_front() {
            return Ok(event);
        }
        self.live.recv().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_backlog_is_replayed_before_live_events() {
        let (tx, rx) = broadcast::channel(8);
        let mut subscription = Subscription::new([InterceptorEvent::Replied], rx);
        tx.send(InterceptorEvent::Error(InterceptorError::new("boom")))
            .unwrap();

        assert_eq!(subscription.recv().await.unwrap(), InterceptorEvent::Replied);
        assert_eq!(
            subscription.recv().await.unwrap(),
            InterceptorEvent::Error(InterceptorError::new("boom"))
        );
    }

    #[tokio::test]
    async fn test_closed_after_sender_dropped() {
        let (tx, rx) = broadcast::channel::<InterceptorEvent>(8);
        let mut subscription = Subscription::live(rx);
        drop(tx);
        assert_eq!(subscription.recv().await, Err(RecvError::Closed));
    }
}
