use crate::client::api::ApiClient;
use crate::client::controller::error::ClientError;
use crate::client::model::identity::{MerchantIdentity, Role, UserIdentity};

/// Per-process context handed to every component instead of ambient globals.
/// Holds at most one identity per role; a missing identity means "not logged in".
#[derive(Debug, Clone)]
pub(crate) struct Session {
    api: ApiClient,
    user: Option<UserIdentity>,
    merchant: Option<MerchantIdentity>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: None,
            merchant: None,
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    pub fn user(&self) -> Result<&UserIdentity, ClientError> {
        self.user.as_ref().ok_or(ClientError::NotLoggedIn(Role::User))
    }

    pub fn merchant(&self) -> Result<&MerchantIdentity, ClientError> {
        self.merchant.as_ref().ok_or(ClientError::NotLoggedIn(Role::Merchant))
    }

    pub(crate) fn set_user(&mut self, identity: UserIdentity) {
        self.user = Some(identity);
    }

    pub(crate) fn set_merchant(&mut self, identity: MerchantIdentity) {
        self.merchant = Some(identity);
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.merchant = None;
    }
}
