//! Provider `status_detail` codes mapped to display copy.

/// Classify a rejection code into a user-facing message.
///
/// Total over every input string. Unknown codes keep the raw code in the
/// message so support can diagnose them; they are never silently swallowed.
pub fn classify(status_detail: &str) -> String {
    match status_detail {
        "cc_rejected_bad_filled_card_number" => {
            "Check the card number; it does not look valid.".to_string()
        }
        "cc_rejected_bad_filled_date" => {
            "Check the expiry date on the card.".to_string()
        }
        "cc_rejected_bad_filled_security_code" => {
            "Check the security code (CVV) on the back of the card.".to_string()
        }
        "cc_rejected_bad_filled_other" => {
            "Some card details look wrong. Review the form and try again.".to_string()
        }
        "cc_rejected_insufficient_amount" => {
            "The card has insufficient funds for this purchase.".to_string()
        }
        "cc_rejected_high_risk" | "cc_rejected_blacklist" => {
            "The payment was declined by risk checks. Try a different payment method."
                .to_string()
        }
        "cc_rejected_call_for_authorize" => {
            "Your bank needs to authorize this payment. Call them, then try again."
                .to_string()
        }
        "cc_rejected_card_disabled" => {
            "The card is disabled. Contact your bank to enable it.".to_string()
        }
        "cc_rejected_duplicated_payment" => {
            "A payment for this amount was already made. Use a different card if you need to pay again."
                .to_string()
        }
        "cc_rejected_max_attempts" => {
            "Too many attempts. Wait a moment or use a different card.".to_string()
        }
        "cc_rejected_card_error" | "cc_rejected_other_reason" => {
            "The card could not process the payment. Try again or use a different card."
                .to_string()
        }
        "" => "Payment rejected for an unspecified reason.".to_string(),
        other => format!("Payment rejected: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_get_specific_copy() {
        assert!(classify("cc_rejected_bad_filled_card_number").contains("card number"));
        assert!(classify("cc_rejected_bad_filled_date").contains("expiry"));
        assert!(classify("cc_rejected_bad_filled_security_code").contains("CVV"));
        assert!(classify("cc_rejected_insufficient_amount").contains("insufficient funds"));
        assert!(classify("cc_rejected_high_risk").contains("risk"));
    }

    #[test]
    fn unknown_codes_are_surfaced_not_swallowed() {
        let message = classify("cc_rejected_some_future_code");
        assert!(message.contains("cc_rejected_some_future_code"));
    }

    #[test]
    fn classify_is_total() {
        for input in ["", " ", "cc_rejected_other_reason", "garbage", "ñ\u{1F4B3}"] {
            assert!(!classify(input).is_empty());
        }
    }
}
