use std::sync::Arc;
use std::time::Duration;
use log::warn;
use crate::client::api::ApiClient;
use crate::client::controller::analytics;
use crate::client::controller::board::OrderBoard;
use crate::client::controller::error::ClientError;
use crate::client::controller::rules;
use crate::client::controller::segmentation::SegmentationTrigger;
use crate::client::model::rule::DiscountRule;
use crate::client::model::stats::SalesStats;
use crate::client::model::{PriceLevel, RestaurantId};
use crate::client::scheduler::job::OrderPoller;
use crate::client::state::Session;

/// Tier-dependent views of the merchant panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Dashboard {
    pub rules: Vec<DiscountRule>,
    pub stats: SalesStats,
}

#[derive(Debug)]
pub(crate) struct SegmentationOutcome {
    pub message: String,
    /// reloaded after the job, since tiers may have moved
    pub dashboard: Result<Dashboard, ClientError>,
}

/// Merchant side: rules, order board, segmentation and analytics for one restaurant.
pub(crate) struct MerchantConsole {
    api: ApiClient,
    restaurant_id: RestaurantId,
    name: String,
    board: Arc<OrderBoard>,
    segmentation: SegmentationTrigger,
}

impl MerchantConsole {
    pub fn new(session: &Session) -> Result<Self, ClientError> {
        let merchant = session.merchant()?;
        let api = session.api();
        Ok(Self {
            board: Arc::new(OrderBoard::new(api.clone(), merchant.restaurant_id)),
            segmentation: SegmentationTrigger::new(api.clone()),
            restaurant_id: merchant.restaurant_id,
            name: merchant.name.clone(),
            api,
        })
    }

    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Arc<OrderBoard> {
        &self.board
    }

    /// Keeps the board fresh until the returned handle is stopped or dropped.
    pub fn start_polling(&self, period: Duration) -> OrderPoller {
        OrderPoller::start(self.board.clone(), period)
    }

    pub async fn load_rules(&self) -> Result<Vec<DiscountRule>, ClientError> {
        rules::load_rules(&self.api, self.restaurant_id).await
    }

    pub async fn save_rules(&self, inputs: &[(PriceLevel, &str)]) -> Result<String, ClientError> {
        rules::save_rules(&self.api, self.restaurant_id, inputs).await
    }

    pub async fn stats(&self) -> Result<SalesStats, ClientError> {
        analytics::fetch_stats(&self.api, self.restaurant_id).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ClientError> {
        let (rules, stats) = tokio::try_join!(self.load_rules(), self.stats())?;
        Ok(Dashboard { rules, stats })
    }

    pub async fn run_segmentation(&self) -> Result<SegmentationOutcome, ClientError> {
        let message = self.segmentation.trigger().await?;
        let dashboard = self.dashboard().await;
        if let Err(e) = &dashboard {
            warn!("failed to reload dashboard after segmentation, {}", e);
        }
        Ok(SegmentationOutcome { message, dashboard })
    }
}
