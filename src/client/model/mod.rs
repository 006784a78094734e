pub(crate) mod behavior;
pub(crate) mod config;
pub(crate) mod dish;
pub(crate) mod identity;
pub(crate) mod money;
pub(crate) mod order;
pub(crate) mod restaurant;
pub(crate) mod rule;
pub(crate) mod stats;

pub(crate) type UserId = i64;
pub(crate) type RestaurantId = i64;
pub(crate) type DishId = i64;
pub(crate) type OrderId = i64;
pub(crate) type PriceLevel = i32;
