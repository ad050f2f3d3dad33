use serde::{Deserialize, Serialize};

/// Status written at charge creation. Settlement statuses ("paid",
/// "expired") are set later by the webhook handler, never by this core.
pub const STATUS_CREATED: &str = "created";

/// One row per gateway charge, keyed by the gateway's transaction id.
/// Written exactly once, after the gateway confirms the charge; the webhook
/// reads it back by id to fire the purchase event with fbp/fbc attached.
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: String,
    pub status: String,
    pub plan: String,
    pub email: String,
    pub name: String,
    pub price: f64,
    pub fbp: Option<String>,
    pub fbc: Option<String>,
    pub created_at: String,
}
