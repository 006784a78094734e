use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;
use log::info;
use rust_decimal::Decimal;
use crate::client::api::ApiClient;
use crate::client::controller::error::ClientError;
use crate::client::model::money::Discount;
use crate::client::model::rule::DiscountRule;
use crate::client::model::{PriceLevel, RestaurantId};

/// Tiers the segmentation job assigns.
pub(crate) const PRICE_LEVELS: RangeInclusive<PriceLevel> = 1..=5;

/// Validates the rule form. The first bad entry aborts the save before any request is made.
pub(crate) fn parse_rules(inputs: &[(PriceLevel, &str)]) -> Result<Vec<DiscountRule>, ClientError> {
    if inputs.is_empty() {
        return Err(ClientError::validation("at least one discount rule is required"));
    }
    let mut rules = BTreeMap::new();
    for (level, raw) in inputs {
        let level = *level;
        if !PRICE_LEVELS.contains(&level) {
            return Err(ClientError::validation(format!(
                "level {} is not a price tier ({}-{})",
                level,
                PRICE_LEVELS.start(),
                PRICE_LEVELS.end()
            )));
        }
        let discount = Decimal::from_str(raw.trim())
            .ok()
            .map(Discount)
            .filter(Discount::is_positive)
            .ok_or_else(|| ClientError::validation(format!("level {} has an invalid discount value", level)))?;
        if rules.insert(level, discount).is_some() {
            return Err(ClientError::validation(format!("level {} is listed twice", level)));
        }
    }
    Ok(rules
        .into_iter()
        .map(|(price_level, discount)| DiscountRule { price_level, discount })
        .collect())
}

/// Current rules with every tier present; tiers without a rule show the neutral `1.00`.
pub(crate) async fn load_rules(api: &ApiClient, restaurant_id: RestaurantId) -> Result<Vec<DiscountRule>, ClientError> {
    let fetched = api.get_rules(restaurant_id).await?;
    Ok(PRICE_LEVELS
        .map(|price_level| {
            fetched
                .iter()
                .find(|rule| rule.price_level == price_level)
                .copied()
                .unwrap_or(DiscountRule { price_level, discount: Discount::NONE })
        })
        .collect())
}

/// Replaces the full rule set and returns the server's confirmation.
pub(crate) async fn save_rules(
    api: &ApiClient,
    restaurant_id: RestaurantId,
    inputs: &[(PriceLevel, &str)],
) -> Result<String, ClientError> {
    let rules = parse_rules(inputs)?;
    let response = api.save_rules(restaurant_id, &rules).await?;
    info!("saved {} discount rule(s) for restaurant {}", rules.len(), restaurant_id);
    Ok(response.message.unwrap_or_else(|| "discount rules saved".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use crate::client::api::test_client;
    use crate::client::model::money::discount;

    #[test]
    fn parses_and_sorts_valid_rules() {
        let rules = parse_rules(&[(2, " 0.95"), (1, "0.9")]).unwrap();
        assert_eq!(
            rules,
            vec![
                DiscountRule { price_level: 1, discount: discount("0.9") },
                DiscountRule { price_level: 2, discount: discount("0.95") },
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        for raw in ["-1", "0", "abc", ""] {
            let err = parse_rules(&[(1, "0.9"), (3, raw)]).unwrap_err();
            assert_eq!(err.to_string(), "level 3 has an invalid discount value", "raw={raw:?}");
        }
        assert!(parse_rules(&[(6, "0.9")]).is_err());
        assert!(parse_rules(&[(1, "0.9"), (1, "0.8")]).is_err());
        assert!(parse_rules(&[]).is_err());
    }

    #[tokio::test]
    async fn negative_discount_never_reaches_the_server() {
        let server = MockServer::start_async().await;
        let save = server.mock_async(|when, then| {
            when.method(POST).path("/api/restaurant/1/rules");
            then.status(201).json_body(json!({ "message": "ok" }));
        }).await;

        let err = save_rules(&test_client(server.base_url()), 1, &[(1, "-1")]).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        save.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn saves_full_replacement_set() {
        let server = MockServer::start_async().await;
        let save = server.mock_async(|when, then| {
            when.method(POST)
                .path("/api/restaurant/1/rules")
                .json_body(json!([{ "PriceLevel": 1, "Discount": 0.9 }, { "PriceLevel": 2, "Discount": 1.1 }]));
            then.status(201).json_body(json!({ "message": "updated 2 rules", "new_rules_count": 2 }));
        }).await;

        let message = save_rules(&test_client(server.base_url()), 1, &[(1, "0.9"), (2, "1.1")]).await.unwrap();
        assert_eq!(message, "updated 2 rules");
        save.assert_async().await;
    }

    #[tokio::test]
    async fn load_fills_missing_tiers() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/api/restaurant/1/rules");
            then.status(200).json_body(json!([{ "PriceLevel": 3, "Discount": 0.8 }]));
        }).await;

        let rules = load_rules(&test_client(server.base_url()), 1).await.unwrap();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0], DiscountRule { price_level: 1, discount: Discount::NONE });
        assert_eq!(rules[2], DiscountRule { price_level: 3, discount: discount("0.8") });
    }
}
