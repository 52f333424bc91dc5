//! Intercept Domain - Core assertion types
//!
//! This crate defines what an interceptor assertion observes and compares:
//! interceptions, captured requests, matching rules and assertion messages.
//! All types here are pure Rust with no I/O dependencies.

pub mod capture;
pub mod error;
pub mod id;
pub mod interception;
pub mod matching;
pub mod method;
pub mod settings;
pub mod testing;

pub use capture::{Body, CapturedRequest, Headers};
pub use error::{DomainError, DomainResult};
pub use id::generate_interception_id;
pub use interception::Interception;
pub use matching::{
    body_matches, header_value_eq, headers_include, headers_match_exactly, number_text, values_equal,
};
pub use method::HttpMethod;
pub use settings::{AssertionSettings, DEFAULT_TIMEOUT_MS};
pub use testing::{
    AssertionContext, AssertionFailure, AssertionKind, NEVER_CALLED_MESSAGE, render_template,
    render_value,
};
