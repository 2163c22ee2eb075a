//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities and voting codes.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a human-readable single-use voting code.
    ///
    /// Codes have the form `COVnnn-XXXX`: a zero-padded ordinal within the
    /// assembly's batch followed by four random hex characters, so codes are
    /// short enough to type but not guessable from the ordinal alone.
    #[must_use]
    pub fn generate_voting_code(&self, ordinal: u32) -> String {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(4)
            .collect::<String>()
            .to_uppercase();
        format!("COV{ordinal:03}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_voting_code_format() {
        let id_gen = IdGenerator::new();
        let code = id_gen.generate_voting_code(7);

        assert_eq!(code.len(), 11);
        assert!(code.starts_with("COV007-"));
        let suffix = &code[7..];
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(suffix, suffix.to_uppercase());
    }

    #[test]
    fn test_generate_voting_code_pads_ordinal() {
        let id_gen = IdGenerator::new();
        assert!(id_gen.generate_voting_code(1).starts_with("COV001-"));
        assert!(id_gen.generate_voting_code(78).starts_with("COV078-"));
    }
}
