//! Order settlement: the client asserts only *what* is ordered, the server decides *what it costs*.

use std::fmt;
use log::info;
use crate::client::api::ApiClient;
use crate::client::cart::Cart;
use crate::client::controller::error::ClientError;
use crate::client::model::money::{Discount, Money};
use crate::client::model::order::{OrderIntent, SettlementResult};
use crate::client::model::{OrderId, PriceLevel, UserId};

/// What the user sees after a successful submission. Built from the server verdict only.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SettlementReceipt {
    pub order_id: Option<OrderId>,
    pub price_level_used: PriceLevel,
    pub discount_applied: Discount,
    pub total_price: Money,
}

impl From<SettlementResult> for SettlementReceipt {
    fn from(result: SettlementResult) -> Self {
        Self {
            order_id: result.order_id,
            price_level_used: result.price_level_used,
            discount_applied: result.discount_applied,
            total_price: result.total_price,
        }
    }
}

impl fmt::Display for SettlementReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_id {
            Some(id) => write!(f, "order #{} placed", id)?,
            None => write!(f, "order placed")?,
        }
        write!(
            f,
            " (level {} customer, discount {}), verified total {}",
            self.price_level_used, self.discount_applied, self.total_price
        )
    }
}

/// Snapshot of the cart's dish ids. Cart prices are left behind on purpose.
pub(crate) fn freeze(user_id: UserId, cart: &Cart) -> Result<OrderIntent, ClientError> {
    let restaurant_id = cart
        .restaurant_id()
        .filter(|_| !cart.is_empty())
        .ok_or_else(|| ClientError::validation("cart is empty"))?;
    Ok(OrderIntent {
        user_id,
        restaurant_id,
        dish_ids: cart.dish_ids(),
    })
}

/// Submits `intent`. The returned total supersedes any client-side figure, whatever it was.
pub(crate) async fn settle(api: &ApiClient, intent: &OrderIntent) -> Result<SettlementReceipt, ClientError> {
    let result = api.create_order(intent).await?;
    info!(
        "order {:?} settled for user {} at restaurant {}: level={} discount={} total={}",
        result.order_id,
        intent.user_id,
        intent.restaurant_id,
        result.price_level_used,
        result.discount_applied,
        result.total_price
    );
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use crate::client::api::test_client;
    use crate::client::cart::dish;
    use crate::client::model::money::{discount, money};

    #[test]
    fn freeze_keeps_duplicates_and_drops_prices() {
        let mut cart = Cart::new();
        cart.add_item(&dish(7, 3, "8", "10")).unwrap();
        cart.add_item(&dish(7, 3, "8", "10")).unwrap();
        cart.add_item(&dish(9, 3, "12", "15")).unwrap();
        let intent = freeze(42, &cart).unwrap();
        assert_eq!(intent, OrderIntent { user_id: 42, restaurant_id: 3, dish_ids: vec![7, 7, 9] });
    }

    #[test]
    fn empty_cart_cannot_be_frozen() {
        let mut cart = Cart::new();
        cart.switch_restaurant(3, |_| true);
        let err = freeze(42, &cart).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn settle_takes_server_figures() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path("/api/order/create")
                .json_body(json!({ "user_id": 42, "restaurant_id": 3, "dish_ids": [7, 9] }));
            then.status(201).json_body(json!({
                "message": "下单成功!",
                "order_id": 11,
                "price_level_used": 2,
                "discount_applied": 0.8,
                "total_price": 18.5
            }));
        }).await;

        let intent = OrderIntent { user_id: 42, restaurant_id: 3, dish_ids: vec![7, 9] };
        let receipt = settle(&test_client(server.base_url()), &intent).await.unwrap();
        assert_eq!(
            receipt,
            SettlementReceipt {
                order_id: Some(11),
                price_level_used: 2,
                discount_applied: discount("0.8"),
                total_price: money("18.5"),
            }
        );
        assert_eq!(
            receipt.to_string(),
            "order #11 placed (level 2 customer, discount 0.80), verified total ￥18.50"
        );
        mock.assert_async().await;
    }
}
