use serde::Deserialize;
use crate::client::model::money::Money;
use crate::client::model::{DishId, RestaurantId};

/// Dish as quoted by `GET /api/restaurant/{id}/dishes?user_id=`.
///
/// The server's `discount_label` is not read: labels are derived locally from the prices.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DishQuote {
    pub id: DishId,
    pub name: String,
    pub image_url: Option<String>,
    pub base_price: Money,
    pub final_price: Money,
}

/// Read-only projection of a dish for one (user, restaurant) pair. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DishView {
    pub id: DishId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub image_ref: Option<String>,
    pub base_price: Money,
    pub final_price: Money,
    pub discount_label: Option<String>,
}
