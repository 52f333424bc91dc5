//! ID generation utilities.

use uuid::Uuid;

/// Generates a new interception identifier.
///
/// UUID v7 includes timestamp information, so interceptions registered later
/// sort after earlier ones.
#[must_use]
pub fn generate_interception_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_interception_id_is_v7_and_unique() {
        let first = generate_interception_id();
        let second = generate_interception_id();
        assert_eq!(first.get_version_num(), 7);
        assert_ne!(first, second);
    }
}
