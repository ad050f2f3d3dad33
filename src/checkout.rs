//! Headless checkout session for the sales page modal.
//!
//! The UI collaborator opens a session with the selected plan, renders
//! whatever [`CheckoutState`] says, and calls [`CheckoutSession::submit`]
//! when the buyer sends the form. Closing the modal is dropping the session;
//! an in-flight charge request is never cancelled, the server record exists
//! independently of this session.

use async_trait::async_trait;
use mockall::automock;

use crate::models::payments::{PaymentRequest, PixCharge, Plan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutState {
    Form,
    Loading,
    Pix,
    Success,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Aguarde, seu PIX já está sendo gerado")]
    SubmissionInProgress,
    #[error("Erro: {0}")]
    Payment(String),
    #[error("Nenhum pagamento aguardando confirmação")]
    NotAwaitingPayment,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentApiError {
    #[error("{error}")]
    Server {
        error: String,
        details: Option<serde_json::Value>,
    },
    #[error("Erro de conexão com o servidor. Tente novamente.")]
    Network(#[source] reqwest::Error),
}

/// Buyer data from the modal form. Only browser-level required-field checks
/// apply; the gateway's own rejection is the validation signal.
#[derive(Clone, Debug)]
pub struct BuyerInput {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
}

/// Attribution cookies captured at submission time. Both absent is valid and
/// never blocks checkout; they pass through opaque for the purchase event.
#[derive(Clone, Debug, Default)]
pub struct TrackingContext {
    pub fbp: Option<String>,
    pub fbc: Option<String>,
}

impl TrackingContext {
    /// Reads `_fbp` / `_fbc` out of a `name=value; name=value` cookie header.
    pub fn from_cookies(cookies: &str) -> Self {
        TrackingContext {
            fbp: cookie_value(cookies, "_fbp"),
            fbc: cookie_value(cookies, "_fbc"),
        }
    }
}

fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[automock]
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn create_pix_charge(
        &self,
        request: &PaymentRequest,
    ) -> Result<PixCharge, PaymentApiError>;
}

/// Calls the payment-creation endpoint served by this crate.
pub struct HttpPaymentApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPaymentApi {
    pub fn new(base_url: String) -> Self {
        HttpPaymentApi {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentApi for HttpPaymentApi {
    async fn create_pix_charge(
        &self,
        request: &PaymentRequest,
    ) -> Result<PixCharge, PaymentApiError> {
        let response = self
            .client
            .post(format!("{}/api/gerar-pix", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(PaymentApiError::Network)?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(PaymentApiError::Network)?;

        if !status.is_success() {
            let error = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Erro ao gerar PIX. Tente novamente.")
                .to_string();
            return Err(PaymentApiError::Server {
                error,
                details: body.get("details").cloned(),
            });
        }

        serde_json::from_value(body).map_err(|e| PaymentApiError::Server {
            error: e.to_string(),
            details: None,
        })
    }
}

/// One modal lifecycle: `form → loading → pix → success`, falling back to
/// `form` on any failure. Nothing here is persisted.
pub struct CheckoutSession {
    state: CheckoutState,
    selected_plan: Plan,
    pix_data: Option<PixCharge>,
}

impl CheckoutSession {
    /// Opens the modal for a plan. Re-opening always starts over at the
    /// form, discarding any PIX payload from a previous session.
    pub fn open(plan: Plan) -> Self {
        CheckoutSession {
            state: CheckoutState::Form,
            selected_plan: plan,
            pix_data: None,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn selected_plan(&self) -> &Plan {
        &self.selected_plan
    }

    pub fn pix_data(&self) -> Option<&PixCharge> {
        self.pix_data.as_ref()
    }

    /// Transaction id for the out-of-scope status-polling collaborator.
    pub fn transaction_id(&self) -> Option<&str> {
        self.pix_data.as_ref().map(|charge| charge.id.as_str())
    }

    /// Submits the form for the selected plan, issuing exactly one charge
    /// request. Re-submission is rejected until the request settles back
    /// into `pix` or `form`.
    pub async fn submit(
        &mut self,
        buyer: BuyerInput,
        tracking: TrackingContext,
        api: &dyn PaymentApi,
    ) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::Form {
            return Err(CheckoutError::SubmissionInProgress);
        }
        self.state = CheckoutState::Loading;

        let request = PaymentRequest {
            name: buyer.name,
            email: buyer.email,
            cpf: buyer.cpf,
            phone: buyer.phone,
            plan: self.selected_plan.name.clone(),
            price: self.selected_plan.price,
            fbc: tracking.fbc,
            fbp: tracking.fbp,
        };

        match api.create_pix_charge(&request).await {
            Ok(charge) => {
                self.pix_data = Some(charge);
                self.state = CheckoutState::Pix;
                Ok(())
            }
            Err(e) => {
                // Back to an editable form, plan untouched.
                self.state = CheckoutState::Form;
                Err(CheckoutError::Payment(e.to_string()))
            }
        }
    }

    /// Terminal transition, driven by the out-of-scope settlement signal.
    pub fn confirm_paid(&mut self) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::Pix {
            return Err(CheckoutError::NotAwaitingPayment);
        }
        self.state = CheckoutState::Success;
        Ok(())
    }
}
