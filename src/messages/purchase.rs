//! Purchase and pre-authorization.
//!
//! Both take either raw card data (`purchase` / `preauth`) or a vaulted card
//! (`res_purchase_cc` / `res_preauth_cc`) and share their required fields.

use super::{amount_text, crypt_type_text, customer_reference, descriptor, Transaction};
use crate::errors::{MonerisError, Result};
use crate::request::RequestParameters;
use crate::types::{CvdIndicator, PaymentMethod};
use crate::validation::{validate, Field};
use serde::Serialize;

const REQUIRED: &[Field] = &[
    Field::PaymentMethod,
    Field::OrderNumber,
    Field::CryptType,
    Field::Amount,
    Field::Description,
];

/// Operation element for a raw-card purchase or pre-authorization.
#[derive(Debug, Serialize)]
pub struct CardTransaction {
    /// Card number
    pub pan: String,
    /// Expiry, `YYMM`
    pub expdate: String,
    /// Merchant order number
    pub order_id: String,
    /// Customer reference
    pub cust_id: String,
    /// Two-decimal amount
    pub amount: String,
    /// E-commerce indicator
    pub crypt_type: String,
    /// Statement descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_descriptor: Option<String>,
    /// Card verification data
    pub cvd_info: CvdInfo,
}

/// Card verification block.
#[derive(Debug, Serialize)]
pub struct CvdInfo {
    /// Presence indicator
    pub cvd_indicator: u8,
    /// Security code, empty when the card carries none
    pub cvd_value: String,
}

/// Operation element for a purchase or pre-authorization on a vaulted card.
#[derive(Debug, Serialize)]
pub struct ProfileTransaction {
    /// Vault data key
    pub data_key: String,
    /// Merchant order number
    pub order_id: String,
    /// Customer reference
    pub cust_id: String,
    /// Two-decimal amount
    pub amount: String,
    /// E-commerce indicator
    pub crypt_type: String,
    /// Statement descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_descriptor: Option<String>,
}

/// Builds a `purchase` or `res_purchase_cc` element.
pub fn purchase(params: &RequestParameters) -> Result<Transaction> {
    Ok(match charge(params)? {
        Charge::Card(txn) => Transaction::Purchase(txn),
        Charge::Profile(txn) => Transaction::ResPurchaseCc(txn),
    })
}

/// Builds a `preauth` or `res_preauth_cc` element.
pub fn authorize(params: &RequestParameters) -> Result<Transaction> {
    Ok(match charge(params)? {
        Charge::Card(txn) => Transaction::Preauth(txn),
        Charge::Profile(txn) => Transaction::ResPreauthCc(txn),
    })
}

enum Charge {
    Card(CardTransaction),
    Profile(ProfileTransaction),
}

fn charge(params: &RequestParameters) -> Result<Charge> {
    validate(params, REQUIRED)?;

    let order_id = params.order_number.clone().unwrap_or_default();
    let cust_id = customer_reference(&order_id);

    match params.payment_method {
        Some(PaymentMethod::PaymentProfile) => {
            validate(params, &[Field::CardReference])?;

            Ok(Charge::Profile(ProfileTransaction {
                data_key: params.card_reference.clone().unwrap_or_default(),
                order_id,
                cust_id,
                amount: amount_text(params),
                crypt_type: crypt_type_text(params),
                dynamic_descriptor: descriptor(params),
            }))
        }
        Some(PaymentMethod::Card) => {
            validate(params, &[Field::Card])?;
            let card = params
                .card
                .as_ref()
                .ok_or_else(|| MonerisError::validation("card", "parameter is required"))?;
            card.validate()?;

            let cvd_info = CvdInfo {
                cvd_indicator: CvdIndicator::Present.code(),
                cvd_value: card.cvv.clone().unwrap_or_default(),
            };

            Ok(Charge::Card(CardTransaction {
                pan: card.number.clone(),
                expdate: card.expiry_date_yymm(),
                order_id,
                cust_id,
                amount: amount_text(params),
                crypt_type: crypt_type_text(params),
                dynamic_descriptor: descriptor(params),
                cvd_info,
            }))
        }
        None => Err(MonerisError::validation("paymentMethod", "parameter is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardError, CreditCard};
    use crate::messages::build;
    use crate::types::{CryptType, Operation};
    use chrono::{Datelike, Utc};
    use pretty_assertions::assert_eq;

    fn profile_params() -> RequestParameters {
        RequestParameters::new()
            .with_credentials("store1", "yesguy")
            .with_payment_method(PaymentMethod::PaymentProfile)
            .with_order_number("XXXX-XXXX")
            .with_crypt_type(CryptType::MailOrderSingle)
            .with_card_reference("FAKE_CARD_REFERENCE")
            .with_amount("5.00")
    }

    fn card_params() -> RequestParameters {
        let card = CreditCard::new("4242424242424242", 12, Utc::now().year() + 2).with_cvv("123");
        RequestParameters::new()
            .with_credentials("store1", "yesguy")
            .with_payment_method(PaymentMethod::Card)
            .with_order_number("XXXX-XXXX")
            .with_crypt_type(CryptType::SslEnabledMerchant)
            .with_amount("5")
            .with_description("Coffee")
            .with_card(card)
    }

    #[test]
    fn test_profile_purchase_document() {
        let xml = build(Operation::Purchase, &profile_params()).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?><request>"#,
                "<store_id>store1</store_id><api_token>yesguy</api_token>",
                "<res_purchase_cc><data_key>FAKE_CARD_REFERENCE</data_key>",
                "<order_id>XXXX-XXXX</order_id><cust_id>Transaction_XXXX-XXXX</cust_id>",
                "<amount>5.00</amount><crypt_type>1</crypt_type></res_purchase_cc></request>"
            )
        );
    }

    #[test]
    fn test_profile_purchase_with_descriptor() {
        let xml = build(Operation::Purchase, &profile_params().with_description("Coffee")).unwrap();
        assert!(xml.contains(concat!(
            "<crypt_type>1</crypt_type>",
            "<dynamic_descriptor>Coffee</dynamic_descriptor></res_purchase_cc>"
        )));
    }

    #[test]
    fn test_card_purchase_document() {
        let params = card_params();
        let expdate = params.card.as_ref().unwrap().expiry_date_yymm();
        let xml = build(Operation::Purchase, &params).unwrap();

        assert!(xml.contains(&format!(
            "<purchase><pan>4242424242424242</pan><expdate>{}</expdate>",
            expdate
        )));
        assert!(xml.contains("<amount>5.00</amount><crypt_type>7</crypt_type>"));
        assert!(xml.contains("<dynamic_descriptor>Coffee</dynamic_descriptor>"));
        assert!(xml.contains(
            "<cvd_info><cvd_indicator>1</cvd_indicator><cvd_value>123</cvd_value></cvd_info></purchase>"
        ));
        assert!(!xml.contains('\n'));
    }

    #[test]
    fn test_card_without_cvv_keeps_fixed_indicator() {
        let mut params = card_params();
        if let Some(card) = params.card.as_mut() {
            card.cvv = None;
        }
        let xml = build(Operation::Purchase, &params).unwrap();
        assert!(xml.contains("<cvd_info><cvd_indicator>1</cvd_indicator><cvd_value/></cvd_info>"));
    }

    #[test]
    fn test_authorize_uses_preauth_elements() {
        let xml = build(Operation::Authorize, &card_params()).unwrap();
        assert!(xml.contains("<preauth><pan>"));

        let xml = build(Operation::Authorize, &profile_params()).unwrap();
        assert!(xml.contains("<res_preauth_cc><data_key>"));
    }

    #[test]
    fn test_each_required_field() {
        let cases: [(fn(&mut RequestParameters), &str); 4] = [
            (|p| p.payment_method = None, "paymentMethod"),
            (|p| p.order_number = None, "orderNumber"),
            (|p| p.crypt_type = None, "cryptType"),
            (|p| p.amount = None, "amount"),
        ];

        for (strip, field) in cases {
            let mut params = profile_params();
            strip(&mut params);
            let err = build(Operation::Purchase, &params).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_missing_card_reference() {
        let mut params = profile_params();
        params.card_reference = None;
        let err = build(Operation::Purchase, &params).unwrap_err();
        assert_eq!(err.field(), Some("cardReference"));
    }

    #[test]
    fn test_missing_card() {
        let mut params = card_params();
        params.card = None;
        let err = build(Operation::Purchase, &params).unwrap_err();
        assert_eq!(err.field(), Some("card"));
    }

    #[test]
    fn test_expired_card() {
        let now = Utc::now();
        let expired =
            CreditCard::new("4242424242424242", now.month(), now.year() - 1).with_cvv("123");
        let params = card_params().with_card(expired);
        let err = build(Operation::Purchase, &params).unwrap_err();
        assert!(matches!(err, MonerisError::InvalidCard(CardError::Expired)));
    }

    #[test]
    fn test_long_description() {
        let params = profile_params().with_description("ZGL5Dp0htqaKRzfeIOiVJm");
        let err = build(Operation::Purchase, &params).unwrap_err();
        assert_eq!(err.field(), Some("description"));
    }
}
