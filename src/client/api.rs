//! Typed access to the platform's HTTP/JSON endpoints.

use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use crate::client::controller::error::ClientError;
use crate::client::model::behavior::BehaviorEvent;
use crate::client::model::config::ClientConfig;
use crate::client::model::dish::DishQuote;
use crate::client::model::identity::{
    LoginRequest, MerchantIdentity, MerchantRegistration, UserIdentity, UserRegistration,
};
use crate::client::model::order::{OrderIntent, OrderRecord, OrderStatus, SettlementResult, StatusUpdate};
use crate::client::model::restaurant::Restaurant;
use crate::client::model::rule::{DiscountRule, SaveRulesResponse};
use crate::client::model::stats::SalesStats;
use crate::client::model::{OrderId, RestaurantId, UserId};

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Answer of `POST /api/admin/run_kmeans`.
#[derive(Debug, Deserialize)]
pub(crate) struct SegmentationReport {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!("GET {}", path);
        let res = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(res).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        debug!("POST {}", path);
        let res = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(res).await
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<UserIdentity, ClientError> {
        self.post("/user/login", &LoginRequest { username, password }).await
    }

    pub async fn login_merchant(&self, username: &str, password: &str) -> Result<MerchantIdentity, ClientError> {
        self.post("/restaurant/login", &LoginRequest { username, password }).await
    }

    pub async fn register_user(&self, registration: &UserRegistration<'_>) -> Result<(), ClientError> {
        self.post::<_, IgnoredAny>("/user/register", registration).await.map(drop)
    }

    pub async fn register_merchant(&self, registration: &MerchantRegistration<'_>) -> Result<(), ClientError> {
        self.post::<_, IgnoredAny>("/restaurant/register", registration).await.map(drop)
    }

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, ClientError> {
        self.get("/restaurants").await
    }

    pub async fn list_dishes(&self, restaurant_id: RestaurantId, user_id: UserId) -> Result<Vec<DishQuote>, ClientError> {
        self.get(&format!("/restaurant/{}/dishes?user_id={}", restaurant_id, user_id)).await
    }

    pub async fn create_order(&self, intent: &OrderIntent) -> Result<SettlementResult, ClientError> {
        self.post("/order/create", intent).await
    }

    pub async fn log_behavior(&self, event: &BehaviorEvent) -> Result<(), ClientError> {
        self.post::<_, IgnoredAny>("/log/behavior", event).await.map(drop)
    }

    pub async fn get_rules(&self, restaurant_id: RestaurantId) -> Result<Vec<DiscountRule>, ClientError> {
        self.get(&format!("/restaurant/{}/rules", restaurant_id)).await
    }

    pub async fn save_rules(&self, restaurant_id: RestaurantId, rules: &[DiscountRule]) -> Result<SaveRulesResponse, ClientError> {
        self.post(&format!("/restaurant/{}/rules", restaurant_id), rules).await
    }

    pub async fn list_orders(&self, restaurant_id: RestaurantId, status: OrderStatus) -> Result<Vec<OrderRecord>, ClientError> {
        self.get(&format!("/restaurant/{}/orders?status={}", restaurant_id, status.as_str())).await
    }

    pub async fn update_order_status(&self, order_id: OrderId, status: OrderStatus) -> Result<(), ClientError> {
        self.post::<_, IgnoredAny>(&format!("/order/{}/update_status", order_id), &StatusUpdate { status })
            .await
            .map(drop)
    }

    /// Both a non-2xx answer and `success: false` come back as `Server` errors.
    pub async fn run_segmentation(&self) -> Result<SegmentationReport, ClientError> {
        debug!("POST /admin/run_kmeans");
        let res = self
            .http
            .post(self.url("/admin/run_kmeans"))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = res.status();
        let report: SegmentationReport = decode(res).await?;
        if !report.success {
            return Err(ClientError::Server {
                status,
                message: report.error.unwrap_or_else(|| "segmentation job failed".to_string()),
            });
        }
        Ok(report)
    }

    pub async fn get_stats(&self, restaurant_id: RestaurantId) -> Result<SalesStats, ClientError> {
        self.get(&format!("/restaurant/{}/stats", restaurant_id)).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return res.json::<T>().await.map_err(ClientError::Decode);
    }
    let body = res.json::<ErrorBody>().await.unwrap_or_default();
    Err(ClientError::Server {
        status,
        message: body.error.unwrap_or_else(|| fallback_message(status)),
    })
}

fn fallback_message(status: StatusCode) -> String {
    format!("HTTP {}", status.as_u16())
}

#[cfg(test)]
pub(crate) fn test_client(base_url: String) -> ApiClient {
    ApiClient::new(&ClientConfig::new(base_url)).unwrap()
}
