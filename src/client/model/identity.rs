use derive_more::Display;
use serde::{Deserialize, Serialize};
use crate::client::model::{RestaurantId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum Role {
    #[display("user")]
    User,
    #[display("merchant")]
    Merchant,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserRegistration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub area: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MerchantRegistration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub location: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct UserIdentity {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct MerchantIdentity {
    pub restaurant_id: RestaurantId,
    pub name: String,
}
