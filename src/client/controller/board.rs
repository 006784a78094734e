use std::fmt;
use log::{info, warn};
use tokio::sync::watch;
use crate::client::api::ApiClient;
use crate::client::controller::error::ClientError;
use crate::client::model::order::{OrderRecord, OrderStatus};
use crate::client::model::{OrderId, RestaurantId};
use crate::client::util::time;

/// One status column of the board. Each bucket is written only by its own fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Bucket {
    #[default]
    Loading,
    Loaded(Vec<OrderRecord>),
    Failed(String),
}

impl Bucket {
    pub fn orders(&self) -> &[OrderRecord] {
        match self {
            Bucket::Loaded(orders) => orders,
            Bucket::Loading | Bucket::Failed(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BoardSnapshot {
    pub pending: Bucket,
    pub confirmed: Bucket,
}

impl BoardSnapshot {
    pub fn bucket(&self, status: OrderStatus) -> Option<&Bucket> {
        match status {
            OrderStatus::Pending => Some(&self.pending),
            OrderStatus::Confirmed => Some(&self.confirmed),
            OrderStatus::Completed => None,
        }
    }

    fn bucket_mut(&mut self, status: OrderStatus) -> Option<&mut Bucket> {
        match status {
            OrderStatus::Pending => Some(&mut self.pending),
            OrderStatus::Confirmed => Some(&mut self.confirmed),
            OrderStatus::Completed => None,
        }
    }

    /// Last status this client saw for `order_id`, if the order is on the board.
    pub fn known_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        OrderStatus::BOARD.into_iter().find(|status| {
            self.bucket(*status)
                .is_some_and(|bucket| bucket.orders().iter().any(|order| order.order_id == order_id))
        })
    }
}

/// Merchant order board over the `Pending` and `Confirmed` buckets.
///
/// Status changes are never applied optimistically: a transition is a server
/// round-trip followed by a full refresh.
pub(crate) struct OrderBoard {
    api: ApiClient,
    restaurant_id: RestaurantId,
    state: watch::Sender<BoardSnapshot>,
}

impl OrderBoard {
    pub fn new(api: ApiClient, restaurant_id: RestaurantId) -> Self {
        let (state, _) = watch::channel(BoardSnapshot::default());
        Self { api, restaurant_id, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    /// Refreshes both buckets concurrently; a failure in one leaves the other alone.
    pub async fn refresh(&self) {
        tokio::join!(
            self.refresh_bucket(OrderStatus::Pending),
            self.refresh_bucket(OrderStatus::Confirmed),
        );
    }

    async fn refresh_bucket(&self, status: OrderStatus) {
        let bucket = match self.api.list_orders(self.restaurant_id, status).await {
            Ok(orders) => {
                let (matching, stray): (Vec<_>, Vec<_>) =
                    orders.into_iter().partition(|order| order.belongs_to(status));
                if !stray.is_empty() {
                    warn!(
                        "dropped {} order(s) listed under {} with another status",
                        stray.len(),
                        status
                    );
                }
                Bucket::Loaded(matching)
            }
            Err(e) => {
                warn!("failed to load {} orders for restaurant {}, {}", status, self.restaurant_id, e);
                Bucket::Failed(e.to_string())
            }
        };
        self.state.send_modify(|snapshot| {
            if let Some(slot) = snapshot.bucket_mut(status) {
                *slot = bucket;
            }
        });
    }

    /// Pending -> Confirmed.
    pub async fn confirm(&self, order_id: OrderId) -> Result<(), ClientError> {
        self.advance(order_id, OrderStatus::Confirmed).await
    }

    /// Confirmed -> Completed.
    pub async fn complete(&self, order_id: OrderId) -> Result<(), ClientError> {
        self.advance(order_id, OrderStatus::Completed).await
    }

    /// The server stores whatever status it is sent, so the move is checked here
    /// against freshly listed orders before anything is written.
    async fn advance(&self, order_id: OrderId, target: OrderStatus) -> Result<(), ClientError> {
        let current = match self.snapshot().known_status(order_id) {
            Some(current) => current,
            None => {
                self.refresh().await;
                self.snapshot().known_status(order_id).ok_or_else(|| {
                    ClientError::validation(format!("order {} is not pending or confirmed", order_id))
                })?
            }
        };
        current.transition(target)?;
        self.api.update_order_status(order_id, target).await?;
        info!("order {} moved to {}", order_id, target);
        self.refresh().await;
        Ok(())
    }
}

/// Text card for one order, as shown on the board.
pub(crate) struct OrderCard<'a>(pub &'a OrderRecord);

impl fmt::Display for OrderCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.0;
        write!(f, "#{} from {}  {}", order.order_id, order.user_name, order.total_price)?;
        if let Some(placed) = order.order_time {
            write!(f, "  (waiting {} min)", time::minutes_waiting(placed))?;
        }
        for item in &order.items {
            write!(f, "\n    {} x{} @ {}", item.dish_name, item.quantity, item.final_price_per_item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Mock;
    use serde_json::json;
    use crate::client::api::test_client;
    use crate::client::util::time::helper;

    fn order(id: i64, status: &str) -> serde_json::Value {
        json!({
            "order_id": id,
            "user_name": "alice",
            "status": status,
            "total_price": 18.5,
            "order_time": "2026-10-19T12:00:00",
            "items": [{ "dish_name": "noodles", "quantity": 2, "final_price_per_item": 9.25 }]
        })
    }

    #[tokio::test]
    async fn failing_bucket_does_not_block_the_other() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Pending");
            then.status(500).json_body(json!({ "error": "database is locked" }));
        }).await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Confirmed");
            then.status(200).json_body(json!([order(3, "Confirmed")]));
        }).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        board.refresh().await;
        let snapshot = board.snapshot();
        assert_eq!(snapshot.pending, Bucket::Failed("database is locked".to_string()));
        assert_eq!(snapshot.confirmed.orders().len(), 1);
        assert_eq!(snapshot.confirmed.orders()[0].order_id, 3);
    }

    #[tokio::test]
    async fn orders_are_only_shown_in_the_bucket_queried() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Pending");
            then.status(200).json_body(json!([order(1, "Pending"), order(2, "Completed")]));
        }).await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Confirmed");
            then.status(200).json_body(json!([]));
        }).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        board.refresh().await;
        let snapshot = board.snapshot();
        let pending: Vec<_> = snapshot.pending.orders().iter().map(|o| o.order_id).collect();
        assert_eq!(pending, vec![1]);
        assert_eq!(snapshot.confirmed, Bucket::Loaded(vec![]));
        assert_eq!(snapshot.known_status(1), Some(OrderStatus::Pending));
        assert_eq!(snapshot.known_status(2), None);
    }

    async fn mock_listing<'a>(server: &'a MockServer, pending_body: serde_json::Value, confirmed_body: serde_json::Value) -> (Mock<'a>, Mock<'a>) {
        let pending = server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Pending");
            then.status(200).json_body(pending_body);
        }).await;
        let confirmed = server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders").query_param("status", "Confirmed");
            then.status(200).json_body(confirmed_body);
        }).await;
        (pending, confirmed)
    }

    async fn mock_update(server: &MockServer) -> Mock<'_> {
        server.mock_async(|when, then| {
            when.method(POST).path("/api/order/7/update_status");
            then.status(200).json_body(json!({ "message": "ok" }));
        }).await
    }

    #[tokio::test]
    async fn completing_a_pending_order_is_rejected_locally() {
        let server = MockServer::start_async().await;
        mock_listing(&server, json!([order(7, "Pending")]), json!([])).await;
        let update = mock_update(&server).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        board.refresh().await;
        let err = board.complete(7).await.unwrap_err();
        assert!(matches!(err, ClientError::Transition(_)), "{err:?}");
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn cold_board_loads_orders_before_checking_a_transition() {
        let server = MockServer::start_async().await;
        let (pending, confirmed) = mock_listing(&server, json!([order(7, "Pending")]), json!([])).await;
        let update = mock_update(&server).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        let err = board.complete(7).await.unwrap_err();
        assert_eq!(err.to_string(), "order cannot move from Pending to Completed");
        update.assert_hits_async(0).await;
        pending.assert_hits_async(1).await;
        confirmed.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn order_missing_from_both_buckets_is_not_sent() {
        let server = MockServer::start_async().await;
        mock_listing(&server, json!([]), json!([order(3, "Confirmed")])).await;
        let update = mock_update(&server).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        let err = board.confirm(7).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn server_rejection_is_surfaced_and_board_is_untouched() {
        let server = MockServer::start_async().await;
        let (pending, confirmed) = mock_listing(&server, json!([order(7, "Pending")]), json!([])).await;
        let update = server.mock_async(|when, then| {
            when.method(POST)
                .path("/api/order/7/update_status")
                .json_body(json!({ "status": "Confirmed" }));
            then.status(400).json_body(json!({ "error": "订单未找到" }));
        }).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        board.refresh().await;
        let before = board.snapshot();
        let err = board.confirm(7).await.unwrap_err();
        assert_eq!(err.to_string(), "订单未找到");
        assert_eq!(board.snapshot(), before);
        update.assert_async().await;
        pending.assert_hits_async(1).await;
        confirmed.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn successful_transition_triggers_a_refresh() {
        let server = MockServer::start_async().await;
        let (pending, confirmed) = mock_listing(&server, json!([order(7, "Pending")]), json!([])).await;
        let update = server.mock_async(|when, then| {
            when.method(POST)
                .path("/api/order/7/update_status")
                .json_body(json!({ "status": "Confirmed" }));
            then.status(200).json_body(json!({ "message": "ok", "order_id": 7, "new_status": "Confirmed" }));
        }).await;

        let board = OrderBoard::new(test_client(server.base_url()), 1);
        board.confirm(7).await.unwrap();
        update.assert_async().await;
        // one listing to check the move, one after it
        pending.assert_hits_async(2).await;
        confirmed.assert_hits_async(2).await;
    }

    #[test]
    fn card_shows_items_and_waiting_time() {
        helper::set_local_now("2026-10-19T12:05:00".parse().unwrap());
        let record: OrderRecord = serde_json::from_value(order(9, "Pending")).unwrap();
        let card = OrderCard(&record).to_string();
        assert_eq!(
            card,
            "#9 from alice  ￥18.50  (waiting 5 min)\n    noodles x2 @ ￥9.25"
        );
    }
}
