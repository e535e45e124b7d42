//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProductId` where a
//! `BranchId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ProductId, "Unique identifier for a catalog product.");
typed_id!(BranchId, "Unique identifier for a branch.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(CounterpartyId, "Unique identifier for a customer or supplier.");
typed_id!(CustomerGroupId, "Unique identifier for a customer group.");
typed_id!(PriceListId, "Unique identifier for a price list.");
typed_id!(DocumentId, "Unique identifier for a commercial document.");
typed_id!(LineItemId, "Unique identifier for a document line item.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(TransferId, "Unique identifier for an inter-branch transfer.");
typed_id!(TransferDetailId, "Unique identifier for a transfer detail line.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        // Compile-time property: these are different types, so this test only
        // checks the runtime plumbing.
        let product = ProductId::new();
        let branch = BranchId::new();
        assert_ne!(product.into_inner(), branch.into_inner());
    }

    #[test]
    fn test_display_round_trip() {
        let id = DocumentId::new();
        let parsed = DocumentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let raw = uuid::Uuid::now_v7();
        assert_eq!(PriceListId::from_uuid(raw).into_inner(), raw);
    }
}
