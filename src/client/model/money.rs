use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency amount. Arithmetic is exact; rounding to cents happens in `Display` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Money(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Mul<Discount> for Money {
    type Output = Money;

    fn mul(self, rhs: Discount) -> Money {
        Money(self.0 * rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "￥{:.2}", cents)
    }
}

/// Price multiplier attached to a tier, e.g. `0.8` for 20% off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Discount(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

impl Discount {
    pub const NONE: Discount = Discount(Decimal::ONE);

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Default for Discount {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", rounded)
    }
}

#[cfg(test)]
pub(crate) fn money(s: &str) -> Money {
    use std::str::FromStr;
    Money(Decimal::from_str(s).unwrap())
}

#[cfg(test)]
pub(crate) fn discount(s: &str) -> Discount {
    use std::str::FromStr;
    Discount(Decimal::from_str(s).unwrap())
}
