//! Typed entity IDs.
//!
//! Every table key travels through its own newtype, so a cart row ID cannot
//! be handed to an operation expecting an order ID. The [`define_id!`] macro
//! stamps out the wrapper together with its serde and database plumbing.

/// Define an `i32` newtype ID.
///
/// The generated type is `Copy`, hashes and compares like its inner value,
/// and serializes transparently as a bare number. Under the `postgres`
/// feature it binds and decodes as `INTEGER`, including inside arrays, so
/// slices of IDs work with `= ANY($1)` queries.
///
/// ```rust
/// # use clementine_core::define_id;
/// define_id!(
///     /// Key of a widget row.
///     WidgetId
/// );
///
/// let id = WidgetId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database key.
            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.as_i32()
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::postgres::PgHasArrayType for $name {
            fn array_type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::postgres::PgHasArrayType>::array_type_info()
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Decode<'r, ::sqlx::Postgres>>::decode(value).map(Self::new)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'q> ::sqlx::Encode<'q, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<'q, ::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(
    /// Key of a credential-service account.
    UserId
);
define_id!(
    /// Key of a catalog product.
    ProductId
);
define_id!(
    /// Key of one cart row.
    CartItemId
);
define_id!(
    /// Key of an order header.
    OrderId
);
define_id!(
    /// Key of one order line item.
    OrderItemId
);
define_id!(
    /// Key of one sale log record.
    SaleRecordId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_i32() {
        let id = OrderId::new(41);
        assert_eq!(id.as_i32(), 41);
        assert_eq!(i32::from(id), 41);
        assert_eq!(OrderId::from(41), id);
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&ProductId::new(12)).unwrap(), "12");
        let back: ProductId = serde_json::from_str("12").unwrap();
        assert_eq!(back, ProductId::new(12));
    }

    #[test]
    fn ids_display_as_their_key() {
        assert_eq!(UserId::new(3).to_string(), "3");
    }
}
