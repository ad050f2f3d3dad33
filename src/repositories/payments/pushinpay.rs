use std::time::Duration;

use async_trait::async_trait;

use super::{PaymentError, PixGateway};
use crate::models::payments::{GatewayChargeRequest, GatewayChargeResponse};

// PushinPay has no documented SLA; a charge either answers quickly or not at
// all, so a single bounded attempt beats hanging the buyer's request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PushinPayApi {
    auth_token: String,
    url: String,
    client: reqwest::Client,
}

impl PushinPayApi {
    pub fn new(auth_token: String, url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Could not build HTTP client.");

        Self {
            auth_token,
            url,
            client,
        }
    }
}

#[async_trait]
impl PixGateway for PushinPayApi {
    async fn create_charge(
        &self,
        charge: &GatewayChargeRequest,
    ) -> Result<GatewayChargeResponse, PaymentError> {
        let response = self
            .client
            .post(format!("{}/api/pix/cashIn", self.url))
            .bearer_auth(&self.auth_token)
            .json(charge)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            log::error!("PushinPay rejected charge ({}): {}", status, body);
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                details: body,
            });
        }

        let charge: GatewayChargeResponse =
            serde_json::from_value(body).map_err(|e| PaymentError::Malformed(e.to_string()))?;

        Ok(charge)
    }
}
