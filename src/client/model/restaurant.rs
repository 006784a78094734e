use serde::Deserialize;
use crate::client::model::RestaurantId;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
}
