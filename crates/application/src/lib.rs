//! Intercept Application - Waiting on interceptors and asserting on requests
//!
//! This crate turns the event stream of a mock interceptor into a single
//! outcome and evaluates request assertions against it. The mocking library
//! itself is reached through the [`ports::InterceptorHandle`] port.

pub mod assertions;
pub mod error;
pub mod ports;
pub mod waiter;

#[cfg(test)]
mod test_support;

pub use assertions::{Expect, PendingAssertion, expect, validate_subject};
pub use error::{SubjectError, WaitError, WaitResult};
pub use ports::{
    InterceptorError, InterceptorEvent, InterceptorHandle, RequestDescriptor, Subscription,
};
pub use waiter::{InterceptorWaiter, Outcome, Settle};
