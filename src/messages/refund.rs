//! Refund of a prior purchase or capture.

use super::{amount_text, crypt_type_text, Transaction};
use crate::errors::Result;
use crate::receipt::Receipt;
use crate::request::RequestParameters;
use crate::validation::{validate, Field};
use serde::Serialize;

/// Statement descriptor sent with every refund.
pub const REFUND_DESCRIPTOR: &str = "Refund";

/// Operation element for a refund.
#[derive(Debug, Serialize)]
pub struct RefundTransaction {
    /// Order id of the original transaction
    pub order_id: String,
    /// Two-decimal amount to refund
    pub amount: String,
    /// Transaction number of the original transaction
    pub txn_number: String,
    /// E-commerce indicator, empty when unset
    pub crypt_type: String,
    /// Reference number of the original transaction, empty when unset
    pub cust_id: Option<String>,
    /// Statement descriptor
    pub dynamic_descriptor: &'static str,
}

/// Builds a `refund` element from the amount and the original receipt.
pub fn refund(params: &RequestParameters) -> Result<Transaction> {
    validate(params, &[Field::Amount, Field::TransactionReference])?;

    let original = Receipt::from_transaction_reference(
        params.transaction_reference.as_deref().unwrap_or_default(),
    )?;

    Ok(Transaction::Refund(RefundTransaction {
        order_id: original.receipt_id().unwrap_or_default().to_string(),
        amount: amount_text(params),
        txn_number: original.trans_id().unwrap_or_default().to_string(),
        crypt_type: crypt_type_text(params),
        cust_id: original.reference_num().map(str::to_string),
        dynamic_descriptor: REFUND_DESCRIPTOR,
    }))
}
