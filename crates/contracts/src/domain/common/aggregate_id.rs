use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Identifier of a stored record.
///
/// Stores allocate identifiers from a per-store sequence starting at 1;
/// identifier types decide how a sequence number becomes an id.
pub trait AggregateId:
    Clone + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug + Send + Sync
{
    /// Convert the id to its path/string form
    fn as_string(&self) -> String;

    /// Parse an id from its path/string form
    fn from_string(s: &str) -> Result<Self, String>;

    /// Build the id for the `n`-th record added to a store
    fn from_sequence(n: u64) -> Self;
}

impl AggregateId for i64 {
    fn as_string(&self) -> String {
        ToString::to_string(self)
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>().map_err(|e| format!("Invalid integer id: {}", e))
    }

    fn from_sequence(n: u64) -> Self {
        i64::try_from(n).unwrap_or(i64::MAX)
    }
}

/// String ids are random UUIDs; the sequence number is not encoded
impl AggregateId for String {
    fn as_string(&self) -> String {
        self.clone()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| u.to_string())
            .map_err(|e| format!("Invalid UUID: {}", e))
    }

    fn from_sequence(_n: u64) -> Self {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ids() {
        assert_eq!(<i64 as AggregateId>::from_sequence(7), 7);
        assert_eq!(<i64 as AggregateId>::from_string("42"), Ok(42));
        assert!(<i64 as AggregateId>::from_string("x").is_err());
    }

    #[test]
    fn test_string_ids_are_uuids() {
        let a = <String as AggregateId>::from_sequence(1);
        let b = <String as AggregateId>::from_sequence(1);
        assert_ne!(a, b);
        assert_eq!(<String as AggregateId>::from_string(&a), Ok(a.clone()));
        assert!(<String as AggregateId>::from_string("not-a-uuid").is_err());
    }
}
