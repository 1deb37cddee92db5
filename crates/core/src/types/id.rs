//! Typed entity ids.
//!
//! Every entity gets its own `i32` newtype so an order id can never be
//! passed where an account id is expected. The wrappers are transparent
//! on the wire (plain JSON numbers, plain `INTEGER` columns).

macro_rules! entity_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// The raw id, for logging and query binds.
            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id! {
    /// Id of a customer or admin account.
    AccountId
}
entity_id! {
    /// Id of a product category.
    CategoryId
}
entity_id! {
    /// Id of a catalog product.
    ProductId
}
entity_id! {
    /// Id of an account's cart row.
    CartId
}
entity_id! {
    /// Id of a placed order.
    OrderId
}
