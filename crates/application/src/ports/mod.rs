//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the assertion core and the mocking
//! library that actually intercepts HTTP traffic. Adapters live in the
//! infrastructure layer.

mod interceptor;

pub use interceptor::{
    InterceptorError, InterceptorEvent, InterceptorHandle, RequestDescriptor, Subscription,
};
