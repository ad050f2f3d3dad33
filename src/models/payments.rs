use serde::{Deserialize, Serialize};

/// Offer selected on the sales page. Immutable once a checkout session opens.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Plan {
    pub name: String,
    /// Price in BRL, two decimal places.
    pub price: f64,
}

/// Wire payload the checkout client posts to `/api/gerar-pix`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PaymentRequest {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    pub plan: String,
    pub price: f64,
    pub fbc: Option<String>,
    pub fbp: Option<String>,
}

/// Payload returned to the client so it can render the QR code.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixCharge {
    pub id: String,
    pub qr_code_base64: String,
    pub copia_e_cola: String,
}

/// Cash-in request sent to PushinPay. `value` is in centavos; the gateway
/// silently misreads fractional amounts.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GatewayChargeRequest {
    pub value: i64,
    pub webhook_url: String,
    pub payer: Payer,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Payer {
    pub name: String,
    /// CPF, digits only.
    pub document: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GatewayChargeResponse {
    pub id: String,
    pub qr_code_base64: String,
    pub qr_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_charge_wire_field_names() {
        let charge = PixCharge {
            id: "9c29870c".to_string(),
            qr_code_base64: "iVBOR".to_string(),
            copia_e_cola: "00020126".to_string(),
        };

        let json = serde_json::to_value(&charge).unwrap();
        assert_eq!(json["id"], "9c29870c");
        assert_eq!(json["qrCodeBase64"], "iVBOR");
        assert_eq!(json["copiaECola"], "00020126");
    }

    #[test]
    fn test_gateway_charge_request_shape() {
        let charge = GatewayChargeRequest {
            value: 16790,
            webhook_url: "https://zerovicios.app/api/webhook".to_string(),
            payer: Payer {
                name: "Maria Silva".to_string(),
                document: "12345678900".to_string(),
                email: "maria@email.com".to_string(),
            },
        };

        let json = serde_json::to_value(&charge).unwrap();
        assert_eq!(json["value"], 16790);
        assert_eq!(json["webhook_url"], "https://zerovicios.app/api/webhook");
        assert_eq!(json["payer"]["document"], "12345678900");
    }

    #[test]
    fn test_payment_request_accepts_null_tracking() {
        let json = serde_json::json!({
            "name": "Maria Silva",
            "email": "maria@email.com",
            "cpf": "123.456.789-00",
            "phone": "(11) 99999-9999",
            "plan": "Kit 5 Meses",
            "price": 167.90,
            "fbc": null,
            "fbp": null
        });

        let request: PaymentRequest = serde_json::from_value(json).unwrap();
        assert!(request.fbc.is_none());
        assert!(request.fbp.is_none());
        assert_eq!(request.plan, "Kit 5 Meses");
    }
}
