// Helpers shared by the payment path. The gateway only accepts integer
// amounts in centavos and digits-only tax documents.

/// Converts a price in BRL (two decimal places) to centavos.
pub fn amount_in_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// Strips everything but decimal digits from a CPF, keeping digit order.
pub fn sanitize_document(document: &str) -> String {
    document.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_in_cents() {
        assert_eq!(amount_in_cents(123.90), 12390);
        assert_eq!(amount_in_cents(167.90), 16790);
        assert_eq!(amount_in_cents(227.90), 22790);
        assert_eq!(amount_in_cents(0.0), 0);
    }

    #[test]
    fn test_amount_in_cents_single_decimal() {
        // 19.9 * 100 is not exact in floating point; rounding must land on 1990.
        assert_eq!(amount_in_cents(19.9), 1990);
    }

    #[test]
    fn test_sanitize_document() {
        assert_eq!(sanitize_document("123.456.789-00"), "12345678900");
        assert_eq!(sanitize_document("12345678900"), "12345678900");
        assert_eq!(sanitize_document(" 529.982.247-25 "), "52998224725");
        assert_eq!(sanitize_document(""), "");
    }
}
