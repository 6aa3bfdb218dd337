//! Request documents.
//!
//! Every operation produces the same envelope: a `request` root whose first
//! two children are `store_id` and `api_token`, followed by exactly one
//! operation element. The document is a single line; the gateway rejects
//! line breaks inside it.
//!
//! Each builder validates the fields its operation needs before producing
//! the operation element, so nothing reaches the network on bad input.

pub mod completion;
pub mod purchase;
pub mod refund;
pub mod vault;

use crate::errors::Result;
use crate::request::RequestParameters;
use crate::types::Operation;
use crate::utils::{normalize_amount, to_xml_document};
use crate::validation::{validate, Field};
use serde::Serialize;

pub use completion::CompletionTransaction;
pub use purchase::{CardTransaction, CvdInfo, ProfileTransaction};
pub use refund::RefundTransaction;
pub use vault::{AddCardTransaction, DeleteCardTransaction};

/// Root element of every request document.
pub const ROOT_ELEMENT: &str = "request";

/// The operation element carried by a request; the variant name is the
/// element name.
#[derive(Debug, Serialize)]
pub enum Transaction {
    /// Card purchase
    #[serde(rename = "purchase")]
    Purchase(CardTransaction),

    /// Card pre-authorization
    #[serde(rename = "preauth")]
    Preauth(CardTransaction),

    /// Purchase against a vaulted card
    #[serde(rename = "res_purchase_cc")]
    ResPurchaseCc(ProfileTransaction),

    /// Pre-authorization against a vaulted card
    #[serde(rename = "res_preauth_cc")]
    ResPreauthCc(ProfileTransaction),

    /// Refund of a prior transaction
    #[serde(rename = "refund")]
    Refund(RefundTransaction),

    /// Completion of a prior pre-authorization (capture, or void at zero)
    #[serde(rename = "completion")]
    Completion(CompletionTransaction),

    /// Card added to the vault
    #[serde(rename = "res_add_cc")]
    ResAddCc(AddCardTransaction),

    /// Card removed from the vault
    #[serde(rename = "res_delete")]
    ResDelete(DeleteCardTransaction),
}

#[derive(Serialize)]
struct Envelope<'a> {
    store_id: &'a str,
    api_token: &'a str,
    #[serde(rename = "$value")]
    transaction: Transaction,
}

/// Validates the parameters for `operation` and builds its request document.
///
/// # Examples
///
/// ```
/// use moneris_rs::messages::build;
/// use moneris_rs::request::RequestParameters;
/// use moneris_rs::types::Operation;
///
/// let params = RequestParameters::new()
///     .with_credentials("store1", "yesguy")
///     .with_card_reference("ot-abc123");
///
/// let xml = build(Operation::DeleteCard, &params).unwrap();
/// assert!(xml.contains("<res_delete><data_key>ot-abc123</data_key></res_delete>"));
/// ```
pub fn build(operation: Operation, params: &RequestParameters) -> Result<String> {
    let transaction = match operation {
        Operation::Purchase => purchase::purchase(params)?,
        Operation::Authorize => purchase::authorize(params)?,
        Operation::Refund => refund::refund(params)?,
        Operation::Void => completion::void(params)?,
        Operation::Capture => completion::capture(params)?,
        Operation::CreateCard => vault::create_card(params)?,
        Operation::DeleteCard => vault::delete_card(params)?,
    };

    validate(params, &[Field::MerchantId, Field::MerchantKey])?;

    let envelope = Envelope {
        store_id: params.merchant_id.as_deref().unwrap_or_default(),
        api_token: params.merchant_key.as_deref().unwrap_or_default(),
        transaction,
    };

    to_xml_document(ROOT_ELEMENT, &envelope)
}

/// `cust_id` the gateway records for an order.
fn customer_reference(order_number: &str) -> String {
    format!("Transaction_{}", order_number)
}

/// Amount in two-decimal form; falls back to the raw value if it was never
/// validated.
fn amount_text(params: &RequestParameters) -> String {
    let raw = params.amount.as_deref().unwrap_or_default();
    normalize_amount(raw).unwrap_or_else(|| raw.to_string())
}

/// Crypt type code, empty when unset.
fn crypt_type_text(params: &RequestParameters) -> String {
    params
        .crypt_type
        .map(|code| code.to_string())
        .unwrap_or_default()
}

/// Description, if it is set and non-empty.
fn descriptor(params: &RequestParameters) -> Option<String> {
    params
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MonerisError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_order() {
        let params = RequestParameters::new()
            .with_credentials("store5", "yesguy")
            .with_card_reference("ot-key");

        let xml = build(Operation::DeleteCard, &params).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="utf-8"?><request><store_id>store5</store_id><api_token>yesguy</api_token><res_delete><data_key>ot-key</data_key></res_delete></request>"#
        );
    }

    #[test]
    fn test_missing_credentials() {
        let params = RequestParameters::new().with_card_reference("ot-key");
        let err = build(Operation::DeleteCard, &params).unwrap_err();
        assert!(matches!(err, MonerisError::Validation { field: "merchantId", .. }));
    }

    #[test]
    fn test_operation_fields_are_checked_before_credentials() {
        let err = build(Operation::DeleteCard, &RequestParameters::new()).unwrap_err();
        assert_eq!(err.field(), Some("cardReference"));
    }

    #[test]
    fn test_helpers() {
        let params = RequestParameters::new().with_amount("7").with_description("");
        assert_eq!(amount_text(&params), "7.00");
        assert_eq!(crypt_type_text(&params), "");
        assert_eq!(descriptor(&params), None);
        assert_eq!(customer_reference("A-1"), "Transaction_A-1");
    }
}
