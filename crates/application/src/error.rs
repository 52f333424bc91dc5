//! Application error types

use std::time::Duration;

use thiserror::Error;

use crate::ports::InterceptorError;

/// Why an interceptor outcome was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// Neither completion nor error arrived in time.
    #[error("the request has not been received by the interceptor within {0:?}")]
    Timeout(Duration),

    /// The interceptor emitted an `error` event.
    #[error("interceptor error: {0}")]
    Interceptor(#[from] InterceptorError),

    /// The interceptor's event stream ended before completion.
    #[error("interceptor event stream closed")]
    Closed,
}

/// The assertion subject is not a usable interceptor handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    /// The handle has no registered interceptions.
    #[error("you must provide a valid interceptor: no interceptions are registered")]
    NoInterceptions,
}

/// Result type alias for waiting on an interceptor.
pub type WaitResult<T> = Result<T, WaitError>;
