//! Adapters implementing the application ports.

mod mock_scope;

pub use mock_scope::{IncomingRequest, MockScope};
