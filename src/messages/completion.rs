//! Completions: capture of a pre-authorization, and void.
//!
//! The gateway voids a pre-authorization by completing it for zero.

use super::{amount_text, crypt_type_text, descriptor, Transaction};
use crate::errors::Result;
use crate::receipt::Receipt;
use crate::request::RequestParameters;
use crate::validation::{validate, Field};
use serde::Serialize;

/// Completion amount used to void a transaction.
pub const VOID_AMOUNT: &str = "0.00";

/// Statement descriptor sent with every void.
pub const VOID_DESCRIPTOR: &str = "void";

/// Operation element for a completion.
#[derive(Debug, Serialize)]
pub struct CompletionTransaction {
    /// Order id of the original transaction
    pub order_id: String,
    /// Two-decimal amount to complete
    pub comp_amount: String,
    /// Transaction number of the original transaction
    pub txn_number: String,
    /// E-commerce indicator, empty when unset
    pub crypt_type: String,
    /// Reference number of the original transaction, empty when unset
    pub cust_id: Option<String>,
    /// Statement descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_descriptor: Option<String>,
}

impl CompletionTransaction {
    fn new(
        original: &Receipt,
        comp_amount: String,
        params: &RequestParameters,
        dynamic_descriptor: Option<String>,
    ) -> Self {
        Self {
            order_id: original.receipt_id().unwrap_or_default().to_string(),
            comp_amount,
            txn_number: original.trans_id().unwrap_or_default().to_string(),
            crypt_type: crypt_type_text(params),
            cust_id: original.reference_num().map(str::to_string),
            dynamic_descriptor,
        }
    }
}

/// Builds a zero-amount `completion` element that voids the original.
pub fn void(params: &RequestParameters) -> Result<Transaction> {
    validate(params, &[Field::TransactionReference])?;
    let original = original_receipt(params)?;

    Ok(Transaction::Completion(CompletionTransaction::new(
        &original,
        VOID_AMOUNT.to_string(),
        params,
        Some(VOID_DESCRIPTOR.to_string()),
    )))
}

/// Builds a `completion` element capturing `amount` of the original.
pub fn capture(params: &RequestParameters) -> Result<Transaction> {
    validate(params, &[Field::Amount, Field::TransactionReference, Field::Description])?;
    let original = original_receipt(params)?;

    Ok(Transaction::Completion(CompletionTransaction::new(
        &original,
        amount_text(params),
        params,
        descriptor(params),
    )))
}

fn original_receipt(params: &RequestParameters) -> Result<Receipt> {
    Receipt::from_transaction_reference(params.transaction_reference.as_deref().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MonerisError;
    use crate::messages::build;
    use crate::types::Operation;

    const REFERENCE: &str = r#"<?xml version="1.0" encoding="utf-8"?><response><receipt><ReceiptId>order-9</ReceiptId><ReferenceNum>6600001</ReferenceNum><TransID>55-0_11</TransID></receipt></response>"#;

    fn params() -> RequestParameters {
        RequestParameters::new()
            .with_credentials("store1", "yesguy")
            .with_transaction_reference(REFERENCE)
    }

    #[test]
    fn test_void_document() {
        let xml = build(Operation::Void, &params().with_crypt_type(7)).unwrap();
        assert!(xml.contains(concat!(
            "<completion><order_id>order-9</order_id><comp_amount>0.00</comp_amount>",
            "<txn_number>55-0_11</txn_number><crypt_type>7</crypt_type>",
            "<cust_id>6600001</cust_id><dynamic_descriptor>void</dynamic_descriptor></completion>"
        )));
        assert!(!xml.contains('\n'));
    }

    #[test]
    fn test_void_without_reference_number() {
        let params = RequestParameters::new()
            .with_credentials("store1", "yesguy")
            .with_transaction_reference(
                "<response><receipt><ReceiptId>order-9</ReceiptId><TransID>55-0_11</TransID></receipt></response>",
            );

        let xml = build(Operation::Void, &params).unwrap();
        assert!(xml.contains(
            "<txn_number>55-0_11</txn_number><crypt_type/><cust_id/><dynamic_descriptor>void</dynamic_descriptor>"
        ));
    }

    #[test]
    fn test_void_ignores_amount() {
        let xml = build(Operation::Void, &params().with_amount("99.99")).unwrap();
        assert!(xml.contains("<comp_amount>0.00</comp_amount>"));
    }

    #[test]
    fn test_void_with_unreadable_reference() {
        let params = RequestParameters::new().with_transaction_reference("test");
        let err = build(Operation::Void, &params).unwrap_err();
        assert!(matches!(err, MonerisError::InvalidTransactionReference(_)));
        assert!(err.is_preflight());
    }

    #[test]
    fn test_void_requires_reference() {
        let err = build(Operation::Void, &RequestParameters::new()).unwrap_err();
        assert_eq!(err.field(), Some("transactionReference"));
    }

    #[test]
    fn test_capture_document() {
        let params = params().with_amount("12").with_crypt_type(7);
        let xml = build(Operation::Capture, &params).unwrap();
        assert!(xml.contains(
            "<completion><order_id>order-9</order_id><comp_amount>12.00</comp_amount>"
        ));
        assert!(!xml.contains("dynamic_descriptor"));
    }

    #[test]
    fn test_capture_requires_amount() {
        let err = build(Operation::Capture, &params()).unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }
}
