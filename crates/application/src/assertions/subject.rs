//! Subject validation.

use crate::error::SubjectError;
use crate::ports::InterceptorHandle;

/// Checks that `subject` is a usable interceptor handle.
///
/// # Errors
/// Returns [`SubjectError::NoInterceptions`] if nothing was ever registered on it.
pub fn validate_subject(subject: &dyn InterceptorHandle) -> Result<(), SubjectError> {
    if subject.interceptions().is_empty() {
        return Err(SubjectError::NoInterceptions);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::{InterceptorEvent, Subscription};
    use intercept_domain::{HttpMethod, Interception};
    use tokio::sync::broadcast;

    struct Registered(Vec<Interception>);

    impl InterceptorHandle for Registered {
        fn interceptions(&self) -> &[Interception] {
            &self.0
        }

        fn subscribe(&self) -> Subscription {
            let (_, rx) = broadcast::channel::<InterceptorEvent>(1);
            Subscription::live(rx)
        }
    }

    #[test]
    fn test_rejects_handle_without_interceptions() {
        assert_eq!(
            validate_subject(&Registered(Vec::new())),
            Err(SubjectError::NoInterceptions)
        );
    }

    #[test]
    fn test_accepts_registered_handle() {
        let interception = Interception::new(HttpMethod::Get, "someurl.com", "/").unwrap();
        assert!(validate_subject(&Registered(vec![interception])).is_ok());
    }
}
