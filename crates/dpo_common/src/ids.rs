//! The `define_id!` macro for opaque `u32` arena indices.
//!
//! Every generated ID is `Copy`, `Hash`, `Ord` and `Serialize`/`Deserialize`
//! (the calling crate must depend on `serde`). IDs index directly into the
//! owning arena via [`index`](#method.index).

/// Declares an opaque, copyable `u32` newtype ID.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the ID as a `usize` arena index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    define_id!(
        /// Test-only ID.
        SampleId
    );

    #[test]
    fn roundtrip_raw() {
        let id = SampleId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering_and_hash() {
        let a = SampleId::from_raw(3);
        let b = SampleId::from_raw(4);
        assert!(a < b);
        let set: HashSet<_> = [a, b, SampleId::from_raw(3)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_and_serde_are_plain_numbers() {
        let id = SampleId::from_raw(7);
        assert_eq!(format!("{id}"), "7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: SampleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
