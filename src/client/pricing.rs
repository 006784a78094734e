//! Discount/price resolution for a single dish.
//!
//! The resolved price is provisional display data. The order endpoint recomputes
//! every price on its own, so nothing here ever feeds an order payload.

use rust_decimal::Decimal;
use crate::client::model::dish::{DishQuote, DishView};
use crate::client::model::money::{Discount, Money};
use crate::client::model::RestaurantId;

/// Personalized tier of one user at one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tier {
    pub discount: Discount,
}

impl Tier {
    pub fn new(discount: Discount) -> Self {
        Self { discount }
    }

    /// Recovers the multiplier behind a server quote.
    /// `None` means no personalization applies (yet).
    pub fn from_quote(base: Money, quoted_final: Money) -> Option<Tier> {
        if base.0 <= Decimal::ZERO || quoted_final == base {
            return None;
        }
        quoted_final.0.checked_div(base.0).map(|ratio| Tier::new(Discount(ratio)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedPrice {
    pub final_price: Money,
    pub discount_label: Option<String>,
}

/// `final = base * discount`, unrounded.
///
/// Missing tiers and non-positive multipliers mean full price. Multipliers above
/// one are capped so a displayed price never exceeds the base price.
pub(crate) fn resolve(base: Money, tier: Option<Tier>) -> ResolvedPrice {
    let discount = tier
        .map(|t| t.discount)
        .filter(Discount::is_positive)
        .map(|d| d.min(Discount::NONE))
        .unwrap_or(Discount::NONE);
    let final_price = base * discount;
    let discount_label = (final_price != base).then(|| label_for(discount));
    ResolvedPrice { final_price, discount_label }
}

fn label_for(discount: Discount) -> String {
    format!("{}%", (discount.0 * Decimal::ONE_HUNDRED).trunc().normalize())
}

/// Builds the dish view from a server quote, re-deriving price and label locally.
pub(crate) fn project(restaurant_id: RestaurantId, quote: DishQuote) -> DishView {
    let tier = Tier::from_quote(quote.base_price, quote.final_price);
    let ResolvedPrice { final_price, discount_label } = resolve(quote.base_price, tier);
    DishView {
        id: quote.id,
        restaurant_id,
        name: quote.name,
        image_ref: quote.image_url,
        base_price: quote.base_price,
        final_price,
        discount_label,
    }
}
