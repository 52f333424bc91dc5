//! Interceptor waiter.
//!
//! Bridges the event stream of an [`InterceptorHandle`] into a single
//! [`Outcome`]: the first request's body and headers once the interceptor
//! reports completion, or a [`WaitError`] on error or timeout.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use intercept_domain::CapturedRequest;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::error::{WaitError, WaitResult};
use crate::ports::{InterceptorEvent, InterceptorHandle, Subscription};

/// One-time settlement of an outcome.
///
/// Only the first [`resolve`](Self::resolve) or [`reject`](Self::reject)
/// takes effect; every later call is a no-op returning `false`.
#[derive(Debug)]
pub struct Settle<T> {
    sender: Option<oneshot::Sender<T>>,
}

impl<T> Settle<T> {
    /// Wraps the sending half of an outcome channel.
    #[must_use]
    pub const fn new(sender: oneshot::Sender<T>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Returns true once the outcome has been settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.sender.is_none()
    }

    /// Completes when the receiving side is dropped. Never completes once settled.
    pub async fn closed(&mut self) {
        match self.sender.as_mut() {
            Some(sender) => sender.closed().await,
            None => std::future::pending().await,
        }
    }

    fn settle(&mut self, value: T) -> bool {
        let Some(sender) = self.sender.take() else {
            return false;
        };
        if sender.send(value).is_err() {
            debug!("outcome dropped before it was settled");
        }
        true
    }
}

impl<T, E> Settle<Result<T, E>> {
    /// Resolves the outcome with `value`.
    pub fn resolve(&mut self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Rejects the outcome with `error`.
    pub fn reject(&mut self, error: E) -> bool {
        self.settle(Err(error))
    }
}

/// The single-resolution result of waiting on an interceptor.
#[derive(Debug)]
#[must_use = "an outcome does nothing unless awaited"]
pub struct Outcome {
    receiver: oneshot::Receiver<WaitResult<CapturedRequest>>,
}

impl Future for Outcome {
    type Output = WaitResult<CapturedRequest>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(WaitError::Closed)))
    }
}

/// Waits for one request/completion cycle on an interceptor.
pub struct InterceptorWaiter;

impl InterceptorWaiter {
    /// Subscribes to `handle` and starts the timeout immediately.
    ///
    /// Events are consumed on a spawned task. Dropping the returned
    /// [`Outcome`] stops the task along with its timer.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(handle: &dyn InterceptorHandle, timeout: Duration) -> Outcome {
        let subscription = handle.subscribe();
        let deadline = Instant::now() + timeout;
        let (sender, receiver) = oneshot::channel();
        tokio::spawn(capture(subscription, deadline, timeout, Settle::new(sender)));
        Outcome { receiver }
    }
}

async fn capture(
    mut subscription: Subscription,
    deadline: Instant,
    timeout: Duration,
    mut settle: Settle<WaitResult<CapturedRequest>>,
) {
    let expiry = sleep_until(deadline);
    tokio::pin!(expiry);
    let mut captured: Option<CapturedRequest> = None;

    while !settle.is_settled() {
        tokio::select! {
            () = &mut expiry => {
                debug!(?timeout, "interceptor wait timed out");
                settle.reject(WaitError::Timeout(timeout));
            }
            () = settle.closed() => {
                debug!("outcome dropped, stop waiting");
                return;
            }
            event = subscription.recv() => match event {
                Ok(InterceptorEvent::Request(request)) => {
                    if captured.is_none() {
                        debug!(interception = %request.interception.id, "request captured");
                        captured = Some(CapturedRequest::new(request.headers, &request.body));
                    }
                }
                Ok(InterceptorEvent::Replied) => {
                    debug!(captured = captured.is_some(), "interceptor replied");
                    settle.resolve(captured.take().unwrap_or_default());
                }
                Ok(InterceptorEvent::Error(error)) => {
                    debug!(%error, "interceptor reported an error");
                    settle.reject(WaitError::Interceptor(error));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "interceptor subscription lagged, events were lost");
                }
                Err(RecvError::Closed) => {
                    settle.reject(WaitError::Closed);
                }
            },
        }
    }
}
