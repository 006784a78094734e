use log::{debug, info, warn};
use tokio::select;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use crate::client::api::ApiClient;
use crate::client::model::behavior::BehaviorEvent;

/// Best-effort behavior log. Recording never blocks and never fails the caller.
#[derive(Debug, Clone)]
pub(crate) struct BehaviorLogger {
    tx: mpsc::Sender<BehaviorEvent>,
}

/// Handle on the drain task. Queued events not yet sent are dropped on `shutdown`.
pub(crate) struct BehaviorDrain {
    tracker: TaskTracker,
    cancel_token: CancellationToken,
}

impl BehaviorLogger {
    pub fn spawn(api: ApiClient, capacity: usize) -> (Self, BehaviorDrain) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let cancel_token = CancellationToken::new();
        let tracker = TaskTracker::new();
        tracker.spawn(drain(api, rx, cancel_token.clone()));
        tracker.close();
        (Self { tx }, BehaviorDrain { tracker, cancel_token })
    }

    pub fn record(&self, event: BehaviorEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("behavior queue full, dropping {} event", event.action_type);
            }
            Err(TrySendError::Closed(event)) => {
                debug!("behavior log closed, dropping {} event", event.action_type);
            }
        }
    }
}

impl BehaviorDrain {
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        self.tracker.wait().await;
    }
}

async fn drain(api: ApiClient, mut rx: mpsc::Receiver<BehaviorEvent>, cancel_token: CancellationToken) {
    loop {
        let event = select! {
            event = rx.recv() => match event {
                Some(event) => event,
                None => break,
            },
            _ = cancel_token.cancelled() => break,
        };
        if let Err(e) = api.log_behavior(&event).await {
            warn!("failed to log {} for restaurant {}, {}", event.action_type, event.restaurant_id, e);
        }
    }
    info!("behavior log drain stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use crate::client::api::test_client;
    use crate::client::model::behavior::ActionType;

    fn event(restaurant_id: i64) -> BehaviorEvent {
        BehaviorEvent { user_id: 1, restaurant_id, action_type: ActionType::ViewRestaurant }
    }

    #[tokio::test]
    async fn events_reach_the_server_in_the_background() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST).path("/api/log/behavior").json_body(json!({
                "user_id": 1, "restaurant_id": 5, "action_type": "view_restaurant"
            }));
            then.status(201).json_body(json!({ "message": "Log received" }));
        }).await;

        let (logger, drain) = BehaviorLogger::spawn(test_client(server.base_url()), 8);
        logger.record(event(5));
        drop(logger);
        drain.tracker.wait().await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_failures_are_swallowed() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST).path("/api/log/behavior");
            then.status(500).json_body(json!({ "error": "Log failed" }));
        }).await;

        let (logger, drain) = BehaviorLogger::spawn(test_client(server.base_url()), 8);
        logger.record(event(1));
        logger.record(event(2));
        drop(logger);
        drain.tracker.wait().await;
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn recording_after_shutdown_is_a_no_op() {
        let (logger, drain) = BehaviorLogger::spawn(test_client("http://127.0.0.1:9".to_string()), 1);
        drain.shutdown().await;
        logger.record(event(1));
        logger.record(event(2));
    }
}
