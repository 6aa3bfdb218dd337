//! Caller-facing result of a gateway operation.

use crate::receipt::{interpret, Receipt};

/// The gateway's answer to one request.
///
/// Built from the raw reply; never fails. See [`Receipt::parse`] for how
/// unreadable replies are handled.
///
/// # Examples
///
/// ```
/// use moneris_rs::response::Response;
///
/// let response = Response::from_reply(
///     b"<response><receipt><ReceiptId>order-1</ReceiptId><TransID>7-0_1</TransID>\
///       <ResponseCode>027</ResponseCode><Message>APPROVED</Message></receipt></response>",
/// );
///
/// assert!(response.is_successful());
/// assert_eq!(response.transaction_id(), Some("7-0_1"));
/// assert!(response.transaction_reference().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    receipt: Receipt,
    data: String,
}

impl Response {
    /// Interprets a raw reply body.
    pub fn from_reply(raw: &[u8]) -> Self {
        let (receipt, data) = interpret(raw);
        Self { receipt, data }
    }

    /// Whether the gateway approved the operation.
    pub fn is_successful(&self) -> bool {
        self.receipt.is_successful()
    }

    /// Vault data key, for card storage operations.
    pub fn card_reference(&self) -> Option<&str> {
        self.receipt.data_key()
    }

    /// Gateway response code.
    pub fn code(&self) -> Option<&str> {
        self.receipt.response_code()
    }

    /// Issuer authorization code.
    pub fn auth_code(&self) -> Option<&str> {
        self.receipt.auth_code()
    }

    /// Gateway transaction number.
    pub fn transaction_id(&self) -> Option<&str> {
        self.receipt.trans_id()
    }

    /// Opaque reference to pass to a later refund, void or capture.
    ///
    /// `None` when the reply carried no usable receipt.
    pub fn transaction_reference(&self) -> Option<String> {
        if !self.receipt.has_transaction_identity() {
            return None;
        }
        self.receipt.to_transaction_reference().ok()
    }

    /// Gateway reference number.
    pub fn reference_num(&self) -> Option<&str> {
        self.receipt.reference_num()
    }

    /// Human-readable message.
    pub fn message(&self) -> Option<&str> {
        self.receipt.message()
    }

    /// Order id the transaction was recorded under.
    pub fn order_number(&self) -> Option<&str> {
        self.receipt.receipt_id()
    }

    /// The reply on a single line, or the raw payload if it was not XML.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The parsed receipt.
    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }
}
