//! Shared test doubles.

use intercept_domain::{HttpMethod, Interception};
use tokio::sync::broadcast;

use crate::ports::{InterceptorEvent, InterceptorHandle, RequestDescriptor, Subscription};

/// A handle with one `GET /` interception driven by hand.
pub struct FakeHandle {
    pub interceptions: Vec<Interception>,
    pub sender: broadcast::Sender<InterceptorEvent>,
}

impl FakeHandle {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// A handle whose event channel retains at most `capacity` events.
    #[allow(clippy::unwrap_used)]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            interceptions: vec![Interception::new(HttpMethod::Get, "someurl.com", "/").unwrap()],
            sender,
        }
    }

    pub fn unregistered() -> Self {
        Self {
            interceptions: Vec::new(),
            ..Self::new()
        }
    }

    pub fn request(&self, headers: &[(&str, &str)], body: &[u8]) {
        let descriptor = RequestDescriptor {
            headers: headers.iter().copied().collect(),
            interception: self.interceptions[0].clone(),
            body: body.to_vec(),
        };
        self.emit(InterceptorEvent::Request(descriptor));
    }

    pub fn emit(&self, event: InterceptorEvent) {
        let _ = self.sender.send(event);
    }
}

impl InterceptorHandle for FakeHandle {
    fn interceptions(&self) -> &[Interception] {
        &self.interceptions
    }

    fn subscribe(&self) -> Subscription {
        Subscription::live(self.sender.subscribe())
    }
}
