use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::payments::{PaymentRequest, PixCharge};
use crate::repositories::payments::{PaymentError, PaymentRepository};

pub enum PaymentServiceRequest {
    CreatePixCharge {
        request: PaymentRequest,
        response: oneshot::Sender<Result<PixCharge, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct PaymentRequestHandler {
    repository: Arc<PaymentRepository>,
}

impl PaymentRequestHandler {
    /// Fails fast when the gateway credential or the public base URL is
    /// missing; neither is something the buyer can retry around.
    pub fn new(
        auth_token: String,
        gateway_url: String,
        base_url: String,
        pool: PgPool,
    ) -> Result<Self, ServiceError> {
        if auth_token.trim().is_empty() {
            return Err(ServiceError::Configuration("Token ausente".to_string()));
        }
        if base_url.trim().is_empty() {
            return Err(ServiceError::Configuration("Base URL ausente".to_string()));
        }

        let repository = Arc::new(PaymentRepository::new(
            auth_token,
            gateway_url,
            &base_url,
            pool,
        ));

        Ok(PaymentRequestHandler { repository })
    }

    async fn create_pix_charge(&self, request: PaymentRequest) -> Result<PixCharge, ServiceError> {
        log::info!(
            "Creating PIX charge: plan={} price={}",
            request.plan,
            request.price
        );

        let charge = self
            .repository
            .create_pix_charge(&request)
            .await
            .map_err(|e| match e {
                PaymentError::Rejected { status, details } => {
                    ServiceError::Gateway { status, details }
                }
                PaymentError::Transport(e) => {
                    ServiceError::Communication("PushinPay".to_string(), e.to_string())
                }
                PaymentError::Malformed(message) => ServiceError::Internal(message),
                PaymentError::Store(e) => {
                    ServiceError::Repository("Transaction".to_string(), e.to_string())
                }
            })?;

        log::info!("PIX charge created: {}", charge.id);
        Ok(charge)
    }
}

#[async_trait]
impl RequestHandler<PaymentServiceRequest> for PaymentRequestHandler {
    async fn handle_request(&self, request: PaymentServiceRequest) {
        match request {
            PaymentServiceRequest::CreatePixCharge { request, response } => {
                let charge = self.create_pix_charge(request).await;
                let _ = response.send(charge);
            }
        }
    }
}

pub struct PaymentService;

impl PaymentService {
    pub fn new() -> Self {
        PaymentService {}
    }
}

#[async_trait]
impl Service<PaymentServiceRequest, PaymentRequestHandler> for PaymentService {}
