use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::settings::Settings;

pub mod http;
pub mod payments;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Configuração de servidor incompleta ({0})")]
    Configuration(String),
    #[error("Falha ao gerar Pix na operadora")]
    Gateway {
        status: u16,
        details: serde_json::Value,
    },
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let (payment_tx, mut payment_rx) = mpsc::channel(512);

    let mut payment_service = payments::PaymentService::new();

    log::info!("Starting payment service.");
    let payment_handler = payments::PaymentRequestHandler::new(
        settings.pushinpay.auth_token,
        settings.pushinpay.url,
        settings.server.base_url,
        pool.clone(),
    )?;
    tokio::spawn(async move {
        payment_service.run(payment_handler, &mut payment_rx).await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(payment_tx, settings.server.bind).await?;

    Ok(())
}
