//! Request assertions on interceptor handles.
//!
//! Start with [`expect`], optionally negate with [`Expect::not`], then pick
//! one of the four assertions. Each validates the subject synchronously and
//! returns a [`PendingAssertion`] to await.

mod expect;
mod subject;

pub use expect::{Expect, PendingAssertion, expect};
pub use subject::validate_subject;
