use serde::{Deserialize, Serialize};
use crate::client::model::money::Discount;
use crate::client::model::PriceLevel;

/// One per tier per restaurant; always read and written as a full set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct DiscountRule {
    #[serde(rename = "PriceLevel")]
    pub price_level: PriceLevel,
    #[serde(rename = "Discount")]
    pub discount: Discount,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SaveRulesResponse {
    pub message: Option<String>,
}
