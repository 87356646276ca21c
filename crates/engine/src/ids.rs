//! Human-readable entity identifiers.
//!
//! Each entity kind has a fixed prefix and a zero-padded sequence number
//! (`C001`, `CD042`, `TH000317`). The sequence itself is derived durably by
//! the ops layer (`Engine::next_id`) from ids already in storage, so the
//! format here is a pure function of the count.

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Customer,
    Card,
    Case,
    Trip,
    Tap,
}

impl IdKind {
    /// Fixed id prefix for this entity kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Customer => "C",
            Self::Card => "CD",
            Self::Case => "CS",
            Self::Trip => "T",
            Self::Tap => "TH",
        }
    }

    /// Zero-padding width of the sequence part.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Customer | Self::Card | Self::Case => 3,
            Self::Trip | Self::Tap => 6,
        }
    }

    /// Formats the id for sequence number `n`.
    ///
    /// The width is a minimum: once a sequence outgrows its padding the id
    /// simply gets longer, it never wraps or truncates.
    #[must_use]
    pub fn format(self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix(), n, width = self.width())
    }

    /// Parses the numeric suffix of an id with this kind's prefix.
    ///
    /// Returns an error for ids that don't follow the allocator format, such
    /// as externally supplied card ids. Those can never collide with
    /// allocator output, so callers treat the error as "not ours".
    pub fn sequence_of(self, id: &str) -> Result<u64, EngineError> {
        let suffix = id
            .strip_prefix(self.prefix())
            .ok_or_else(|| EngineError::InvalidId(format!("'{id}' has no {:?} prefix", self)))?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::InvalidId(format!(
                "'{id}' has a non-numeric sequence"
            )));
        }
        suffix
            .parse()
            .map_err(|_| EngineError::InvalidId(format!("'{id}' sequence out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_fixed_width() {
        assert_eq!(IdKind::Customer.format(1), "C001");
        assert_eq!(IdKind::Card.format(42), "CD042");
        assert_eq!(IdKind::Case.format(7), "CS007");
        assert_eq!(IdKind::Trip.format(12), "T000012");
        assert_eq!(IdKind::Tap.format(317), "TH000317");
    }

    #[test]
    fn width_is_a_minimum() {
        assert_eq!(IdKind::Customer.format(12345), "C12345");
    }

    #[test]
    fn parses_own_sequences() {
        assert_eq!(IdKind::Tap.sequence_of("TH000317").unwrap(), 317);
        assert_eq!(IdKind::Customer.sequence_of("C001").unwrap(), 1);
    }

    #[test]
    fn rejects_foreign_ids() {
        assert!(IdKind::Card.sequence_of("GOCARD-9").is_err());
        assert!(IdKind::Card.sequence_of("CD").is_err());
        assert!(IdKind::Customer.sequence_of("Cx01").is_err());
    }
}
