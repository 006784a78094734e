use log::info;
use crate::client::controller::error::ClientError;
use crate::client::model::identity::{MerchantIdentity, MerchantRegistration, UserIdentity, UserRegistration};
use crate::client::state::Session;

fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Session {
    pub async fn login_user(&mut self, username: &str, password: &str) -> Result<&UserIdentity, ClientError> {
        require("username", username)?;
        require("password", password)?;
        let identity = self.api().login_user(username, password).await?;
        info!("logged in as user {} (id={})", identity.username, identity.user_id);
        self.set_user(identity);
        self.user()
    }

    pub async fn login_merchant(&mut self, username: &str, password: &str) -> Result<&MerchantIdentity, ClientError> {
        require("username", username)?;
        require("password", password)?;
        let identity = self.api().login_merchant(username, password).await?;
        info!("logged in as merchant of {} (restaurant_id={})", identity.name, identity.restaurant_id);
        self.set_merchant(identity);
        self.merchant()
    }

    pub async fn register_user(&self, username: &str, password: &str, area: Option<&str>) -> Result<(), ClientError> {
        require("username", username)?;
        require("password", password)?;
        self.api()
            .register_user(&UserRegistration { username, password, area: optional(area) })
            .await
    }

    pub async fn register_merchant(
        &self,
        username: &str,
        password: &str,
        name: &str,
        location: Option<&str>,
    ) -> Result<(), ClientError> {
        require("username", username)?;
        require("password", password)?;
        require("restaurant name", name)?;
        self.api()
            .register_merchant(&MerchantRegistration { username, password, name, location: optional(location) })
            .await
    }
}
