use std::sync::Arc;
use std::time::Duration;
use log::info;
use tokio::time::MissedTickBehavior;
use tokio::{select, time};
use tokio_util::sync::{CancellationToken, DropGuard};
use tokio_util::task::TaskTracker;
use crate::client::controller::board::OrderBoard;

async fn worker(board: Arc<OrderBoard>, period: Duration, cancel_token: CancellationToken) {
    let mut interval = time::interval(period); // first tick fires immediately
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        select! {
            _ = interval.tick() => {},
            _ = cancel_token.cancelled() => {
                info!("received cancel signal, returning gracefully");
                return;
            }
        }

        select! {
            _ = board.refresh() => {},
            _ = cancel_token.cancelled() => {
                info!("cancelled during refresh, returning gracefully");
                return;
            }
        }
    }
}

/// Keeps an order board refreshed for as long as the handle lives.
pub(crate) struct OrderPoller {
    tracker: TaskTracker,
    cancel_token: CancellationToken,
    _guard: DropGuard,
}

impl OrderPoller {
    pub fn start(board: Arc<OrderBoard>, period: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let tracker = TaskTracker::new();
        tracker.spawn(worker(board, period, cancel_token.clone()));
        tracker.close();
        Self {
            tracker,
            _guard: cancel_token.clone().drop_guard(),
            cancel_token,
        }
    }

    /// Stops polling and waits for an in-progress refresh to be abandoned.
    pub async fn stop(self) {
        self.cancel_token.cancel();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use httpmock::Mock;
    use crate::client::api::test_client;

    /// A request cut off by cancellation may still land after the task is gone.
    async fn settled_hits(mock: &Mock<'_>) -> usize {
        time::sleep(Duration::from_millis(50)).await;
        mock.hits_async().await
    }

    #[tokio::test]
    async fn polls_until_stopped() {
        let server = MockServer::start_async().await;
        let listing = server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders");
            then.status(200).json_body(json!([]));
        }).await;

        let board = Arc::new(OrderBoard::new(test_client(server.base_url()), 1));
        let mut rx = board.subscribe();
        let poller = OrderPoller::start(board.clone(), Duration::from_millis(20));
        rx.changed().await.unwrap();
        rx.changed().await.unwrap();
        poller.stop().await;

        let hits = settled_hits(&listing).await;
        assert!(hits >= 2, "hits={hits}");
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(listing.hits_async().await, hits);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels_polling() {
        let server = MockServer::start_async().await;
        let listing = server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/orders");
            then.status(200).json_body(json!([]));
        }).await;

        let board = Arc::new(OrderBoard::new(test_client(server.base_url()), 1));
        let mut rx = board.subscribe();
        let poller = OrderPoller::start(board.clone(), Duration::from_millis(20));
        rx.changed().await.unwrap();
        let tracker = poller.tracker.clone();
        drop(poller);
        tracker.wait().await;

        let hits = settled_hits(&listing).await;
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(listing.hits_async().await, hits);
    }
}
