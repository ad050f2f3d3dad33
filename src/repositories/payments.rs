use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use sqlx::PgPool;

use crate::models::payments::{GatewayChargeRequest, GatewayChargeResponse, Payer, PaymentRequest, PixCharge};
use crate::models::transactions::{TransactionRecord, STATUS_CREATED};
use crate::repositories::transactions::{PostgresTransactionStore, TransactionStore};
use crate::utils;

mod pushinpay;

pub use pushinpay::PushinPayApi;

/// Path PushinPay calls back on settlement, appended to the configured
/// public base URL.
pub const WEBHOOK_PATH: &str = "/api/webhook";

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The processor refused the charge; its error body is kept verbatim so
    /// the caller can surface it.
    #[error("Falha ao gerar Pix na operadora")]
    Rejected {
        status: u16,
        details: serde_json::Value,
    },
    #[error("Gateway transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed gateway response: {0}")]
    Malformed(String),
    /// The charge already exists at the gateway when this fires; there is no
    /// rollback, only an error to the buyer.
    #[error("Transaction store failure: {0}")]
    Store(#[source] anyhow::Error),
}

#[automock]
#[async_trait]
pub trait PixGateway: Send + Sync {
    async fn create_charge(
        &self,
        charge: &GatewayChargeRequest,
    ) -> Result<GatewayChargeResponse, PaymentError>;
}

pub struct PaymentRepository {
    gateway: Arc<dyn PixGateway>,
    store: Arc<dyn TransactionStore>,
    webhook_url: String,
}

impl PaymentRepository {
    pub fn new(auth_token: String, gateway_url: String, base_url: &str, conn: PgPool) -> Self {
        let gateway = Arc::new(PushinPayApi::new(auth_token, gateway_url));
        let store = Arc::new(PostgresTransactionStore::new(conn));

        PaymentRepository {
            gateway,
            store,
            webhook_url: format!("{}{}", base_url, WEBHOOK_PATH),
        }
    }

    pub fn with_parts(
        gateway: Arc<dyn PixGateway>,
        store: Arc<dyn TransactionStore>,
        webhook_url: String,
    ) -> Self {
        PaymentRepository {
            gateway,
            store,
            webhook_url,
        }
    }

    /// Creates a PIX charge at the gateway and records it.
    ///
    /// The record is written only after the gateway confirms the charge, so a
    /// rejected charge never leaves a row behind. The store key is always the
    /// gateway's transaction id.
    pub async fn create_pix_charge(
        &self,
        request: &PaymentRequest,
    ) -> Result<PixCharge, PaymentError> {
        let charge = GatewayChargeRequest {
            value: utils::amount_in_cents(request.price),
            webhook_url: self.webhook_url.clone(),
            payer: Payer {
                name: request.name.clone(),
                document: utils::sanitize_document(&request.cpf),
                email: request.email.clone(),
            },
        };

        let response = self.gateway.create_charge(&charge).await?;

        let record = TransactionRecord {
            id: response.id.clone(),
            status: STATUS_CREATED.to_string(),
            plan: request.plan.clone(),
            email: request.email.clone(),
            name: request.name.clone(),
            price: request.price,
            fbp: request.fbp.clone(),
            fbc: request.fbc.clone(),
            created_at: Utc::now().to_rfc3339(),
        };

        self.store.put(&record).await.map_err(PaymentError::Store)?;

        Ok(PixCharge {
            id: response.id,
            qr_code_base64: response.qr_code_base64,
            copia_e_cola: response.qr_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transactions::MockTransactionStore;

    fn payment_request() -> PaymentRequest {
        PaymentRequest {
            name: "Maria Silva".to_string(),
            email: "maria@email.com".to_string(),
            cpf: "123.456.789-00".to_string(),
            phone: "(11) 99999-9999".to_string(),
            plan: "Kit 5 Meses".to_string(),
            price: 167.90,
            fbc: None,
            fbp: None,
        }
    }

    fn gateway_response() -> GatewayChargeResponse {
        GatewayChargeResponse {
            id: "9c29870c-9f69-4bb6-90d3-2dce9453bb45".to_string(),
            qr_code_base64: "iVBORw0KGgo".to_string(),
            qr_code: "00020126580014br.gov.bcb.pix".to_string(),
        }
    }

    #[tokio::test]
    async fn test_charge_converts_price_and_document_before_gateway_call() {
        let mut gateway = MockPixGateway::new();
        gateway
            .expect_create_charge()
            .withf(|charge| {
                charge.value == 16790
                    && charge.payer.document == "12345678900"
                    && charge.webhook_url == "https://zerovicios.app/api/webhook"
            })
            .times(1)
            .returning(|_| Ok(gateway_response()));

        let mut store = MockTransactionStore::new();
        store.expect_put().times(1).returning(|_| Ok(()));

        let repository = PaymentRepository::with_parts(
            Arc::new(gateway),
            Arc::new(store),
            "https://zerovicios.app/api/webhook".to_string(),
        );

        let charge = repository.create_pix_charge(&payment_request()).await.unwrap();
        assert_eq!(charge.id, "9c29870c-9f69-4bb6-90d3-2dce9453bb45");
        assert_eq!(charge.copia_e_cola, "00020126580014br.gov.bcb.pix");
    }

    #[tokio::test]
    async fn test_record_key_is_gateway_id_with_created_status() {
        let mut gateway = MockPixGateway::new();
        gateway
            .expect_create_charge()
            .returning(|_| Ok(gateway_response()));

        let mut store = MockTransactionStore::new();
        store
            .expect_put()
            .withf(|record| {
                record.id == "9c29870c-9f69-4bb6-90d3-2dce9453bb45"
                    && record.status == STATUS_CREATED
                    && record.plan == "Kit 5 Meses"
                    && record.price == 167.90
                    && record.fbp.is_none()
                    && record.fbc.is_none()
            })
            .times(1)
            .returning(|_| Ok(()));

        let repository = PaymentRepository::with_parts(
            Arc::new(gateway),
            Arc::new(store),
            "https://zerovicios.app/api/webhook".to_string(),
        );

        repository.create_pix_charge(&payment_request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_charge_writes_no_record() {
        let mut gateway = MockPixGateway::new();
        gateway.expect_create_charge().returning(|_| {
            Err(PaymentError::Rejected {
                status: 422,
                details: serde_json::json!({"message": "invalid document"}),
            })
        });

        let mut store = MockTransactionStore::new();
        store.expect_put().times(0);

        let repository = PaymentRepository::with_parts(
            Arc::new(gateway),
            Arc::new(store),
            "https://zerovicios.app/api/webhook".to_string(),
        );

        let result = repository.create_pix_charge(&payment_request()).await;
        assert!(matches!(result, Err(PaymentError::Rejected { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_store_failure_after_gateway_success_is_reported() {
        let mut gateway = MockPixGateway::new();
        gateway
            .expect_create_charge()
            .returning(|_| Ok(gateway_response()));

        let mut store = MockTransactionStore::new();
        store
            .expect_put()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let repository = PaymentRepository::with_parts(
            Arc::new(gateway),
            Arc::new(store),
            "https://zerovicios.app/api/webhook".to_string(),
        );

        let result = repository.create_pix_charge(&payment_request()).await;
        assert!(matches!(result, Err(PaymentError::Store(_))));
    }
}
