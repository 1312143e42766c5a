use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Declares a string-backed identifier newtype. Serialized transparently,
/// so content files write ids as plain strings.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a Story Node.
    NodeId
);
string_id!(
    /// Identifier of an Investigation Node.
    InvestigationId
);
string_id!(
    /// Identifier of a Hotspot, unique within its Investigation Node.
    HotspotId
);
string_id!(
    /// Identifier of a Puzzle Config.
    PuzzleId
);
string_id!(
    /// Identifier of an inventory item. Doubles as its display key.
    ItemId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(NodeId::from("start"), NodeId::new("start".to_string()));
        assert_ne!(NodeId::from("start"), NodeId::from("ending_bad"));
    }

    #[test]
    fn lookup_by_str() {
        let mut map = FxHashMap::default();
        map.insert(ItemId::from("Old Key"), 1);
        assert_eq!(map.get("Old Key"), Some(&1));
        assert_eq!(map.get("Metal Shard"), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PuzzleId::from("office_safe");
        let serialized = ron::to_string(&id).unwrap();
        assert_eq!(serialized, "\"office_safe\"");
        let back: PuzzleId = ron::from_str(&serialized).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_raw_id() {
        assert_eq!(HotspotId::from("bed_pillow").to_string(), "bed_pillow");
    }
}
