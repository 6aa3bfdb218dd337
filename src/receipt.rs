//! Gateway receipts.
//!
//! The gateway answers every transaction with an XML document whose
//! `receipt` element carries the outcome. [`Receipt::parse`] never fails: a
//! reply that is not well-formed XML becomes a receipt holding only
//! [`FALLBACK_MESSAGE`], so callers can always ask [`Receipt::is_successful`].
//!
//! A receipt also travels back to the gateway. After a purchase or an
//! authorization the caller keeps [`Receipt::to_transaction_reference`] and
//! hands it to a later refund, void or capture, which reads the order id,
//! transaction number and reference number out of it again.

use crate::errors::{MonerisError, Result};
use crate::utils::{single_line, to_xml_document};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Message carried by the receipt built for an unreadable reply.
pub const FALLBACK_MESSAGE: &str = "Oops! something went wrong, Try again after sometime.";

/// Response codes the gateway uses for approved transactions.
pub const APPROVED_RESPONSE_CODES: RangeInclusive<i64> = 0..=49;

const RECEIPT_ELEMENT: &[u8] = b"receipt";

/// Parsed `receipt` element of a gateway reply.
///
/// Every field is `None` when its element is absent, and `Some("")` when
/// the element is present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Receipt {
    #[serde(rename = "ReceiptId", skip_serializing_if = "Option::is_none")]
    receipt_id: Option<String>,

    #[serde(rename = "ReferenceNum", skip_serializing_if = "Option::is_none")]
    reference_num: Option<String>,

    #[serde(rename = "ResponseCode", skip_serializing_if = "Option::is_none")]
    response_code: Option<String>,

    #[serde(rename = "ISO", skip_serializing_if = "Option::is_none")]
    iso: Option<String>,

    #[serde(rename = "AuthCode", skip_serializing_if = "Option::is_none")]
    auth_code: Option<String>,

    #[serde(rename = "TransType", skip_serializing_if = "Option::is_none")]
    trans_type: Option<String>,

    #[serde(rename = "TransAmount", skip_serializing_if = "Option::is_none")]
    trans_amount: Option<String>,

    #[serde(rename = "CardType", skip_serializing_if = "Option::is_none")]
    card_type: Option<String>,

    #[serde(rename = "TransID", skip_serializing_if = "Option::is_none")]
    trans_id: Option<String>,

    #[serde(rename = "Complete", skip_serializing_if = "Option::is_none")]
    complete: Option<String>,

    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(rename = "TimedOut", skip_serializing_if = "Option::is_none")]
    timed_out: Option<String>,

    #[serde(rename = "DataKey", skip_serializing_if = "Option::is_none")]
    data_key: Option<String>,
}

#[derive(Serialize)]
struct TransactionReferenceDocument<'a> {
    receipt: &'a Receipt,
}

/// Outcome of scanning a reply: the receipt (if the document has one) and
/// the document re-written on a single line.
struct Scan {
    receipt: Option<Receipt>,
    normalized: String,
}

impl Receipt {
    /// Parses a raw gateway reply.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneris_rs::receipt::{Receipt, FALLBACK_MESSAGE};
    ///
    /// let receipt = Receipt::parse(b"<receipt><Message>APPROVED</Message></receipt>");
    /// assert!(receipt.is_successful());
    ///
    /// let broken = Receipt::parse(b"502 Bad Gateway");
    /// assert!(!broken.is_successful());
    /// assert_eq!(broken.message(), Some(FALLBACK_MESSAGE));
    /// ```
    pub fn parse(raw: &[u8]) -> Self {
        interpret(raw).0
    }

    /// Returns `true` if the receipt identifies a transaction that a refund,
    /// void or capture can target: both `ReceiptId` and `TransID` are set.
    pub fn has_transaction_identity(&self) -> bool {
        is_set(self.receipt_id.as_deref()) && is_set(self.trans_id.as_deref())
    }

    /// Decodes a transaction reference produced by
    /// [`Receipt::to_transaction_reference`] (or a raw gateway reply).
    ///
    /// The reference must be well-formed XML containing a `receipt` element
    /// with a `ReceiptId` and a `TransID`.
    pub fn from_transaction_reference(reference: &str) -> Result<Self> {
        let scan = scan(reference).map_err(MonerisError::InvalidTransactionReference)?;
        let receipt = scan.receipt.ok_or_else(|| {
            MonerisError::InvalidTransactionReference("no receipt element".to_string())
        })?;

        if !is_set(receipt.receipt_id.as_deref()) {
            return Err(MonerisError::InvalidTransactionReference(
                "missing ReceiptId".to_string(),
            ));
        }
        if !is_set(receipt.trans_id.as_deref()) {
            return Err(MonerisError::InvalidTransactionReference(
                "missing TransID".to_string(),
            ));
        }

        Ok(receipt)
    }

    /// Serializes the receipt into an opaque, single-line reference that a
    /// refund, void or capture accepts.
    pub fn to_transaction_reference(&self) -> Result<String> {
        to_xml_document("response", &TransactionReferenceDocument { receipt: self })
    }

    /// Applies the gateway's success rules, first match wins:
    ///
    /// 1. a data key is set and the message contains `Success`;
    /// 2. the message contains `APPROVED`;
    /// 3. the response code is set and within [`APPROVED_RESPONSE_CODES`].
    ///
    /// The response code must parse as a whole integer. A code with trailing
    /// garbage (`"12abc"`) or no digits (`"abc"`) counts as a failure rather
    /// than being truncated to its leading digits or to zero.
    pub fn is_successful(&self) -> bool {
        let message = self.message.as_deref();

        if is_set(self.data_key.as_deref()) && message.map_or(false, |m| m.contains("Success")) {
            return true;
        }

        if message.map_or(false, |m| m.contains("APPROVED")) {
            return true;
        }

        self.response_code_value()
            .map_or(false, |code| APPROVED_RESPONSE_CODES.contains(&code))
    }

    /// Numeric response code, if one is set.
    pub fn response_code_value(&self) -> Option<i64> {
        self.response_code
            .as_deref()
            .filter(|code| is_set(Some(code)))
            .and_then(|code| code.trim().parse().ok())
    }

    /// Order id the transaction was recorded under.
    pub fn receipt_id(&self) -> Option<&str> {
        self.receipt_id.as_deref()
    }

    /// Gateway reference number.
    pub fn reference_num(&self) -> Option<&str> {
        self.reference_num.as_deref()
    }

    /// Raw response code.
    pub fn response_code(&self) -> Option<&str> {
        self.response_code.as_deref()
    }

    /// ISO response code.
    pub fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }

    /// Issuer authorization code.
    pub fn auth_code(&self) -> Option<&str> {
        self.auth_code.as_deref()
    }

    /// Transaction type code.
    pub fn trans_type(&self) -> Option<&str> {
        self.trans_type.as_deref()
    }

    /// Amount processed.
    pub fn trans_amount(&self) -> Option<&str> {
        self.trans_amount.as_deref()
    }

    /// Card brand code.
    pub fn card_type(&self) -> Option<&str> {
        self.card_type.as_deref()
    }

    /// Gateway transaction number.
    pub fn trans_id(&self) -> Option<&str> {
        self.trans_id.as_deref()
    }

    /// Whether the gateway completed the transaction.
    pub fn complete(&self) -> Option<&str> {
        self.complete.as_deref()
    }

    /// Human-readable message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the gateway timed out.
    pub fn timed_out(&self) -> Option<&str> {
        self.timed_out.as_deref()
    }

    /// Vault data key of a stored card.
    pub fn data_key(&self) -> Option<&str> {
        self.data_key.as_deref()
    }

    fn fallback() -> Self {
        Self {
            message: Some(FALLBACK_MESSAGE.to_string()),
            ..Self::default()
        }
    }

    fn set_field(&mut self, name: &[u8], value: String) {
        let slot = match name {
            b"ReceiptId" => &mut self.receipt_id,
            b"ReferenceNum" => &mut self.reference_num,
            b"ResponseCode" => &mut self.response_code,
            b"ISO" => &mut self.iso,
            b"AuthCode" => &mut self.auth_code,
            b"TransType" => &mut self.trans_type,
            b"TransAmount" => &mut self.trans_amount,
            b"CardType" => &mut self.card_type,
            b"TransID" => &mut self.trans_id,
            b"Complete" => &mut self.complete,
            b"Message" => &mut self.message,
            b"TimedOut" => &mut self.timed_out,
            b"DataKey" => &mut self.data_key,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Parses a raw reply into its receipt and its single-line form.
///
/// A reply without a `receipt` element yields an empty receipt. A reply that
/// is not well-formed yields the fallback receipt and the raw payload.
pub(crate) fn interpret(raw: &[u8]) -> (Receipt, String) {
    let text = String::from_utf8_lossy(raw);

    match scan(&text) {
        Ok(scan) => (scan.receipt.unwrap_or_default(), scan.normalized),
        Err(reason) => {
            tracing::warn!(%reason, body = %text, "gateway reply is not well-formed XML");
            (Receipt::fallback(), single_line(&text))
        }
    }
}

/// Returns `true` if the value is present, non-blank and not the literal
/// `null` the gateway uses for missing values.
pub(crate) fn is_set(value: Option<&str>) -> bool {
    value.map_or(false, |v| {
        let v = v.trim();
        !v.is_empty() && v != "null"
    })
}

/// Walks the document once, checking it is well-formed, collecting the
/// children of the first `receipt` element and re-writing it without
/// whitespace between elements.
fn scan(text: &str) -> std::result::Result<Scan, String> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut writer = Writer::new(Vec::new());

    let mut depth = 0usize;
    let mut roots = 0usize;
    let mut receipt: Option<Receipt> = None;
    let mut receipt_depth: Option<usize> = None;
    let mut field: Option<(Vec<u8>, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;

        match &event {
            Event::Eof => break,
            Event::Start(start) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;

                let name = start.name();
                match receipt_depth {
                    None if receipt.is_none() && name.as_ref() == RECEIPT_ELEMENT => {
                        receipt = Some(Receipt::default());
                        receipt_depth = Some(depth);
                    }
                    Some(d) if depth == d + 1 => {
                        field = Some((name.as_ref().to_vec(), String::new()));
                    }
                    _ => {}
                }
            }
            Event::Empty(start) => {
                if depth == 0 {
                    roots += 1;
                }

                let name = start.name();
                if receipt_depth == Some(depth) {
                    if let Some(r) = receipt.as_mut() {
                        r.set_field(name.as_ref(), String::new());
                    }
                } else if receipt.is_none() && name.as_ref() == RECEIPT_ELEMENT {
                    receipt = Some(Receipt::default());
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err("unexpected closing tag".to_string());
                }

                if let Some(d) = receipt_depth {
                    if depth == d + 1 {
                        if let (Some((name, value)), Some(r)) = (field.take(), receipt.as_mut()) {
                            r.set_field(&name, value);
                        }
                    } else if depth == d {
                        receipt_depth = None;
                    }
                }
                depth -= 1;
            }
            Event::Text(content) => {
                if depth == 0 {
                    return Err("text outside the root element".to_string());
                }
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&content.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(content) => {
                if depth == 0 {
                    return Err("text outside the root element".to_string());
                }
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&String::from_utf8_lossy(content));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }

        writer.write_event(&event).map_err(|e| e.to_string())?;
    }

    if depth != 0 {
        return Err("unclosed element".to_string());
    }
    if roots != 1 {
        return Err(format!("expected one root element, found {}", roots));
    }

    let normalized = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    Ok(Scan {
        receipt,
        normalized: single_line(&normalized),
    })
}
