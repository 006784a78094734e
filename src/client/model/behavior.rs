use derive_more::Display;
use serde::Serialize;
use crate::client::model::{RestaurantId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ActionType {
    #[display("view_restaurant")]
    ViewRestaurant,
    #[display("add_to_cart")]
    AddToCart,
}

/// Body of `POST /api/log/behavior`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BehaviorEvent {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub action_type: ActionType,
}
