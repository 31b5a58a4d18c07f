//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// Used to tag request contexts so their creation and disposal can be
/// correlated in logs.
#[must_use]
pub fn generate_id_v7() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_v7_format() {
        let id = generate_id_v7();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_generate_id_v7_uniqueness() {
        let id1 = generate_id_v7();
        let id2 = generate_id_v7();
        assert_ne!(id1, id2);
    }
}
