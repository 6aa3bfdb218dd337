//! Parameter validation.
//!
//! Each operation names the fields it requires; [`validate`] checks them in
//! order and stops at the first violation.

use crate::errors::{MonerisError, Result};
use crate::request::RequestParameters;
use crate::types::CryptType;
use crate::utils::{is_blank, is_positive_amount, normalize_amount};

/// Maximum length of an order number.
pub const MAX_ORDER_NUMBER_LEN: usize = 50;

/// Maximum length of a dynamic descriptor.
pub const MAX_DESCRIPTION_LEN: usize = 20;

/// A parameter an operation can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Store id
    MerchantId,
    /// API token
    MerchantKey,
    /// Order number
    OrderNumber,
    /// E-commerce indicator
    CryptType,
    /// Amount
    Amount,
    /// Dynamic descriptor (optional, length-checked when present)
    Description,
    /// Payment method
    PaymentMethod,
    /// Vault data key
    CardReference,
    /// Raw card
    Card,
    /// Serialized prior receipt
    TransactionReference,
}

impl Field {
    /// Parameter name as the caller knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Field::MerchantId => "merchantId",
            Field::MerchantKey => "merchantKey",
            Field::OrderNumber => "orderNumber",
            Field::CryptType => "cryptType",
            Field::Amount => "amount",
            Field::Description => "description",
            Field::PaymentMethod => "paymentMethod",
            Field::CardReference => "cardReference",
            Field::Card => "card",
            Field::TransactionReference => "transactionReference",
        }
    }
}

/// Checks the given fields against the parameters.
///
/// # Examples
///
/// ```
/// use moneris_rs::request::RequestParameters;
/// use moneris_rs::validation::{validate, Field};
///
/// let params = RequestParameters::new().with_order_number("A".repeat(51));
/// let err = validate(&params, &[Field::OrderNumber]).unwrap_err();
/// assert_eq!(err.field(), Some("orderNumber"));
/// ```
pub fn validate(params: &RequestParameters, fields: &[Field]) -> Result<()> {
    fields.iter().try_for_each(|field| check(params, *field))
}

fn check(params: &RequestParameters, field: Field) -> Result<()> {
    let name = field.name();
    match field {
        Field::MerchantId => require_str(name, params.merchant_id.as_deref()),
        Field::MerchantKey => require_str(name, params.merchant_key.as_deref()),
        Field::CardReference => require_str(name, params.card_reference.as_deref()),
        Field::TransactionReference => {
            require_str(name, params.transaction_reference.as_deref())
        }
        Field::PaymentMethod => require(name, params.payment_method.is_some()),
        Field::Card => require(name, params.card.is_some()),
        Field::OrderNumber => {
            let order_number = params.order_number.as_deref();
            require_str(name, order_number)?;
            max_len(name, order_number, MAX_ORDER_NUMBER_LEN)
        }
        Field::Description => max_len(name, params.description.as_deref(), MAX_DESCRIPTION_LEN),
        Field::CryptType => {
            let code = params.crypt_type.ok_or_else(|| missing(name))?;
            u8::try_from(code)
                .ok()
                .and_then(|c| CryptType::try_from(c).ok())
                .map(|_| ())
                .ok_or_else(|| MonerisError::validation(name, "must be between 1 and 7"))
        }
        Field::Amount => {
            let amount = params.amount.as_deref();
            require_str(name, amount)?;
            let normalized = amount.and_then(normalize_amount).ok_or_else(|| {
                MonerisError::validation(name, "must be a decimal with at most two fraction digits")
            })?;
            if is_positive_amount(&normalized) {
                Ok(())
            } else {
                Err(MonerisError::validation(name, "must be greater than zero"))
            }
        }
    }
}

fn missing(field: &'static str) -> MonerisError {
    MonerisError::validation(field, "parameter is required")
}

fn require(field: &'static str, present: bool) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(missing(field))
    }
}

fn require_str(field: &'static str, value: Option<&str>) -> Result<()> {
    require(field, !is_blank(value))
}

fn max_len(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(MonerisError::validation(
            field,
            format!("must be at most {} characters", max),
        )),
        _ => Ok(()),
    }
}
