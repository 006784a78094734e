use log::{info, warn};
use crate::client::api::ApiClient;
use crate::client::controller::control::Control;
use crate::client::controller::error::ClientError;

/// Starts the external tier-assignment job. The job itself is opaque; only its
/// binary outcome is reported. Views that depend on tiers must be refreshed by
/// the caller afterwards.
#[derive(Debug, Clone)]
pub(crate) struct SegmentationTrigger {
    api: ApiClient,
    control: Control,
}

impl SegmentationTrigger {
    pub fn new(api: ApiClient) -> Self {
        Self { api, control: Control::new() }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.control.is_enabled()
    }

    pub async fn trigger(&self) -> Result<String, ClientError> {
        let _guard = self
            .control
            .try_disable()
            .ok_or(ClientError::InFlight("segmentation job"))?;
        info!("segmentation job started");
        match self.api.run_segmentation().await {
            Ok(report) => {
                let message = report.message.unwrap_or_else(|| "segmentation finished".to_string());
                info!("segmentation job finished, {}", message);
                Ok(message)
            }
            Err(e) => {
                warn!("segmentation job failed, {}", e);
                Err(e)
            }
        }
    }
}
