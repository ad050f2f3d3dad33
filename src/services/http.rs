use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::{payments::PaymentServiceRequest, ServiceError};
use crate::models::payments::PaymentRequest;

#[derive(Clone)]
struct AppState {
    payment_channel: mpsc::Sender<PaymentServiceRequest>,
}

async fn generate_pix(
    State(state): State<AppState>,
    Json(req): Json<PaymentRequest>,
) -> impl IntoResponse {
    let (payment_tx, payment_rx) = oneshot::channel();

    let send_result = state
        .payment_channel
        .send(PaymentServiceRequest::CreatePixCharge {
            request: req,
            response: payment_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Failed to process request: {}", e)})),
        );
    }

    match payment_rx.await {
        Ok(Ok(charge)) => (StatusCode::OK, Json(json!(charge))),
        Ok(Err(ServiceError::Gateway { details, .. })) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Falha ao gerar Pix na operadora", "details": details})),
        ),
        Ok(Err(service_error)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": service_error.to_string()})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Failed to receive response: {}", e)})),
        ),
    }
}

pub async fn start_http_server(
    payment_channel: mpsc::Sender<PaymentServiceRequest>,
    bind: String,
) -> Result<(), anyhow::Error> {
    let app_state = AppState { payment_channel };

    let app = Router::new()
        .route("/api/gerar-pix", post(generate_pix))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
