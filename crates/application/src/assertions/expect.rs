//! Assertion adapters.

use std::future::Future;
use std::pin::Pin;

use intercept_domain::{
    AssertionContext, AssertionFailure, AssertionKind, AssertionSettings, CapturedRequest,
    NEVER_CALLED_MESSAGE, body_matches, headers_include, headers_match_exactly,
};
use serde_json::Value;
use tracing::debug;

use super::subject::validate_subject;
use crate::error::SubjectError;
use crate::ports::InterceptorHandle;
use crate::waiter::InterceptorWaiter;

/// An assertion waiting for the interceptor to complete.
pub type PendingAssertion = Pin<Box<dyn Future<Output = Result<(), AssertionFailure>> + Send>>;

/// Starts an assertion chain on `subject`.
///
/// The chain waits [`AssertionSettings::default`] (2000 ms) unless
/// [`Expect::with_settings`] overrides it. To honour
/// `INTERCEPT_ASSERT_TIMEOUT_MS`, pass the settings loaded by the
/// infrastructure crate:
///
/// ```ignore
/// let settings = intercept_infrastructure::load_settings()?;
/// let pending = expect(&scope).with_settings(settings).requested()?;
/// ```
///
/// Only interceptor handles can be asserted on:
///
/// ```compile_fail
/// intercept_application::assertions::expect(&"NOT_AN_INTERCEPTOR");
/// ```
#[must_use]
pub fn expect(subject: &dyn InterceptorHandle) -> Expect<'_> {
    Expect::new(subject)
}

/// An assertion chain bound to one interceptor handle.
#[derive(Clone, Copy)]
pub struct Expect<'a> {
    subject: &'a dyn InterceptorHandle,
    context: AssertionContext,
    settings: AssertionSettings,
}

impl<'a> Expect<'a> {
    /// Creates a positive chain with default settings.
    #[must_use]
    pub fn new(subject: &'a dyn InterceptorHandle) -> Self {
        Self {
            subject,
            context: AssertionContext::new(),
            settings: AssertionSettings::default(),
        }
    }

    /// Negates the assertion.
    #[must_use]
    pub const fn not(mut self) -> Self {
        self.context = self.context.not();
        self
    }

    /// Overrides the settings (e.g. the wait timeout).
    #[must_use]
    pub const fn with_settings(mut self, settings: AssertionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Asserts that the interceptor was requested.
    ///
    /// A timeout or interceptor error counts as "not requested", so the
    /// negated form passes in that case.
    ///
    /// # Errors
    /// Returns [`SubjectError`] before anything is awaited if the subject
    /// has no interceptions.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime once the subject is valid,
    /// since the wait runs on a spawned task.
    pub fn requested(self) -> Result<PendingAssertion, SubjectError> {
        validate_subject(self.subject)?;
        let outcome = InterceptorWaiter::spawn(self.subject, self.settings.timeout());
        let context = self.context;
        Ok(Box::pin(async move {
            let kind = AssertionKind::Requested;
            let requested = match outcome.await {
                Ok(_) => true,
                Err(error) => {
                    debug!(%error, "interceptor was not requested");
                    false
                }
            };
            let verdict = context.assert(
                requested,
                kind.message(),
                kind.negated_message(),
                None,
                None,
            );
            log_verdict(kind, context, &verdict);
            verdict
        }))
    }

    /// Asserts that the request body deep-equals `expected`.
    ///
    /// # Errors
    /// Returns [`SubjectError`] if the subject has no interceptions.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime once the subject is valid,
    /// since the wait runs on a spawned task.
    pub fn requested_with(
        self,
        expected: impl Into<Value>,
    ) -> Result<PendingAssertion, SubjectError> {
        self.compare(
            AssertionKind::RequestedWith,
            expected.into(),
            CapturedRequest::body_value,
            |captured, expected| body_matches(captured.body.as_ref(), expected),
        )
    }

    /// Asserts that the request headers are exactly `expected`.
    ///
    /// # Errors
    /// Returns [`SubjectError`] if the subject has no interceptions.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime once the subject is valid,
    /// since the wait runs on a spawned task.
    pub fn requested_with_exact_headers(
        self,
        expected: impl Into<Value>,
    ) -> Result<PendingAssertion, SubjectError> {
        self.compare(
            AssertionKind::RequestedWithExactHeaders,
            expected.into(),
            CapturedRequest::headers_value,
            |captured, expected| headers_match_exactly(captured.headers.as_ref(), expected),
        )
    }

    /// Asserts that the request headers include every pair in `expected`.
    ///
    /// Extra request headers are ignored.
    ///
    /// # Errors
    /// Returns [`SubjectError`] if the subject has no interceptions.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime once the subject is valid,
    /// since the wait runs on a spawned task.
    pub fn requested_with_headers(
        self,
        expected: impl Into<Value>,
    ) -> Result<PendingAssertion, SubjectError> {
        self.compare(
            AssertionKind::RequestedWithHeaders,
            expected.into(),
            CapturedRequest::headers_value,
            |captured, expected| headers_include(captured.headers.as_ref(), expected),
        )
    }

    fn compare(
        self,
        kind: AssertionKind,
        expected: Value,
        actual: fn(&CapturedRequest) -> Option<Value>,
        matches: fn(&CapturedRequest, &Value) -> bool,
    ) -> Result<PendingAssertion, SubjectError> {
        validate_subject(self.subject)?;
        let outcome = InterceptorWaiter::spawn(self.subject, self.settings.timeout());
        let context = self.context;
        Ok(Box::pin(async move {
            let verdict = match outcome.await {
                Ok(captured) => context.assert(
                    matches(&captured, &expected),
                    kind.message(),
                    kind.negated_message(),
                    Some(&expected),
                    actual(&captured).as_ref(),
                ),
                Err(error) => {
                    debug!(%error, assertion = kind.name(), "interceptor was never called");
                    context.assert(false, NEVER_CALLED_MESSAGE, NEVER_CALLED_MESSAGE, None, None)
                }
            };
            log_verdict(kind, context, &verdict);
            verdict
        }))
    }
}

fn log_verdict(
    kind: AssertionKind,
    context: AssertionContext,
    verdict: &Result<(), AssertionFailure>,
) {
    debug!(
        assertion = kind.name(),
        negated = context.is_negated(),
        passed = verdict.is_ok(),
        "assertion evaluated"
    );
}
