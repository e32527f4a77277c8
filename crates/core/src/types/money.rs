//! Monetary amounts as exact fixed-point decimals.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A monetary amount in the store currency, normalized to two decimal places.
///
/// Wraps [`Decimal`] so arithmetic is exact; floating point never touches
/// money. Serializes as a string (e.g. `"50.00"`), which is also how the
/// database driver exchanges `NUMERIC(10,2)` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero in the store currency.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount, rounding to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Unit price times a quantity, as used for order line totals.
    #[must_use]
    pub fn line_total(self, quantity: i32) -> Self {
        Self::new(self.0 * Decimal::from(quantity))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

// Deserialize through `new` so every construction path normalizes the scale.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_to_two_decimal_places() {
        let money = Money::new(Decimal::new(10_456, 3)); // 10.456
        assert_eq!(money.amount(), Decimal::new(1046, 2)); // 10.46
    }

    #[test]
    fn from_cents_builds_exact_amounts() {
        assert_eq!(Money::from_cents(1999).to_string(), "19.99");
        assert_eq!(Money::from_cents(0), Money::ZERO);
    }

    #[test]
    fn line_total_multiplies_unit_price_by_quantity() {
        let unit = Money::from_cents(1000); // 10.00
        assert_eq!(unit.line_total(5), Money::from_cents(5000));
        assert_eq!(unit.line_total(1), unit);
    }

    #[test]
    fn sum_folds_from_zero() {
        let total: Money = [Money::from_cents(1050), Money::from_cents(250), Money::from_cents(5)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(1305));
    }

    #[test]
    fn serializes_as_two_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(5000)).unwrap();
        assert_eq!(json, "\"50.00\"");
    }

    #[test]
    fn deserialization_normalizes_scale() {
        let money: Money = serde_json::from_str("\"50.005\"").unwrap();
        assert_eq!(money, Money::from_cents(5000));
    }
}
