use chrono::NaiveDateTime;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use crate::client::model::money::{Discount, Money};
use crate::client::model::{DishId, OrderId, PriceLevel, RestaurantId, UserId};

/// Merchant-side progress of an order.
///
/// ```text
/// Pending --confirm--> Confirmed --complete--> Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub(crate) enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("order cannot move from {from} to {to}")]
pub(crate) struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Statuses shown on the merchant order board, each in its own bucket.
    pub const BOARD: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Confirmed];

    /// The only status reachable from `self`. There is no way back.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, TransitionError> {
        match self.next() {
            Some(next) if next == to => Ok(to),
            _ => Err(TransitionError { from: self, to }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
        }
    }
}

/// Body of `POST /api/order/create`. Prices are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct OrderIntent {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub dish_ids: Vec<DishId>,
}

/// Server verdict for one submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SettlementResult {
    pub order_id: Option<OrderId>,
    pub price_level_used: PriceLevel,
    pub discount_applied: Discount,
    pub total_price: Money,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

/// Order as listed by `GET /api/restaurant/{id}/orders?status=`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OrderRecord {
    pub order_id: OrderId,
    pub user_name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub total_price: Money,
    #[serde(default)]
    pub order_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OrderLine {
    pub dish_name: String,
    pub quantity: u32,
    pub final_price_per_item: Money,
}

impl OrderRecord {
    /// Whether the record may be shown in the bucket queried for `status`.
    /// Records without a status field are trusted to match the query.
    pub fn belongs_to(&self, status: OrderStatus) -> bool {
        self.status.as_deref().map_or(true, |s| s == status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_single_steps_are_allowed() {
        assert_eq!(OrderStatus::Pending.transition(OrderStatus::Confirmed), Ok(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.transition(OrderStatus::Completed), Ok(OrderStatus::Completed));

        let skip = OrderStatus::Pending.transition(OrderStatus::Completed).unwrap_err();
        assert_eq!(skip, TransitionError { from: OrderStatus::Pending, to: OrderStatus::Completed });
        assert!(OrderStatus::Completed.transition(OrderStatus::Confirmed).is_err());
        assert!(OrderStatus::Confirmed.transition(OrderStatus::Pending).is_err());
        assert!(OrderStatus::Pending.transition(OrderStatus::Pending).is_err());
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn status_round_trips_as_plain_names() {
        let body = serde_json::to_value(StatusUpdate { status: OrderStatus::Confirmed }).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "Confirmed" }));
        let err = TransitionError { from: OrderStatus::Pending, to: OrderStatus::Completed };
        assert_eq!(err.to_string(), "order cannot move from Pending to Completed");
    }

    #[test]
    fn parses_order_record_from_board_payload() {
        let record: OrderRecord = serde_json::from_str(r#"{
            "order_id": 7,
            "user_name": "alice",
            "status": "Pending",
            "total_price": 18.5,
            "order_time": "2026-10-19T12:30:00.123456",
            "items": [{"dish_name": "noodles", "quantity": 2, "final_price_per_item": 9.25}]
        }"#).unwrap();
        assert_eq!(record.order_id, 7);
        assert_eq!(record.items[0].quantity, 2);
        assert!(record.order_time.is_some());
        assert!(record.belongs_to(OrderStatus::Pending));
        assert!(!record.belongs_to(OrderStatus::Confirmed));
    }

    #[test]
    fn intent_carries_no_prices() {
        let intent = OrderIntent { user_id: 1, restaurant_id: 2, dish_ids: vec![3, 3, 4] };
        assert_eq!(
            serde_json::to_value(intent).unwrap(),
            serde_json::json!({ "user_id": 1, "restaurant_id": 2, "dish_ids": [3, 3, 4] })
        );
    }
}
