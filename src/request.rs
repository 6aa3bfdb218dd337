//! Request parameters.
//!
//! [`RequestParameters`] is a plain store of the values an operation may need.
//! It has no behavior beyond setting and reading them; the rules live in
//! [`crate::validation`] and the wire shapes in [`crate::messages`].

use crate::card::CreditCard;
use crate::errors::{MonerisError, Result};
use crate::types::{CryptType, PaymentMethod};
use serde::Deserialize;
use serde_json::Value;

/// Parameters for a single gateway operation.
///
/// # Examples
///
/// ```
/// use moneris_rs::request::RequestParameters;
/// use moneris_rs::types::{CryptType, PaymentMethod};
///
/// let params = RequestParameters::new()
///     .with_payment_method(PaymentMethod::PaymentProfile)
///     .with_card_reference("ot-abc123")
///     .with_order_number("order-1001")
///     .with_crypt_type(CryptType::SslEnabledMerchant)
///     .with_amount("10.00");
///
/// assert_eq!(params.order_number.as_deref(), Some("order-1001"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters {
    /// Store id issued by Moneris
    pub merchant_id: Option<String>,

    /// API token issued by Moneris
    pub merchant_key: Option<String>,

    /// Merchant order number (at most 50 characters)
    pub order_number: Option<String>,

    /// E-commerce indicator code (1-7)
    pub crypt_type: Option<i64>,

    /// Decimal amount, e.g. `"10.00"`
    pub amount: Option<String>,

    /// Dynamic descriptor shown on the statement (at most 20 characters)
    pub description: Option<String>,

    /// How the card is supplied
    pub payment_method: Option<PaymentMethod>,

    /// Vault data key of a stored card
    pub card_reference: Option<String>,

    /// Raw card data
    pub card: Option<CreditCard>,

    /// Serialized receipt of a prior transaction
    pub transaction_reference: Option<String>,

    /// Customer id attached to a vaulted card
    pub customer_id: Option<String>,
}

impl RequestParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from a loose, camelCase JSON object.
    ///
    /// `amount` and `cryptType` may be numbers or strings. An unknown
    /// `paymentMethod` is rejected with [`MonerisError::InvalidPaymentMethod`].
    ///
    /// # Examples
    ///
    /// ```
    /// use moneris_rs::request::RequestParameters;
    /// use serde_json::json;
    ///
    /// let params = RequestParameters::from_value(json!({
    ///     "paymentMethod": "payment_profile",
    ///     "orderNumber": "XXXX-XXXX",
    ///     "cryptType": 1,
    ///     "cardReference": "FAKE_CARD_REFERENCE",
    ///     "amount": 5.00,
    /// })).unwrap();
    ///
    /// assert_eq!(params.crypt_type, Some(1));
    /// assert_eq!(params.amount.as_deref(), Some("5.0"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawParameters = serde_json::from_value(value)?;

        let payment_method = raw
            .payment_method
            .map(|m| m.parse::<PaymentMethod>())
            .transpose()?;

        let crypt_type = match raw.crypt_type {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                scalar_to_string(&v)
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .ok_or_else(|| MonerisError::validation("cryptType", "must be an integer"))?,
            ),
        };

        let card = raw.card.map(RawCard::into_card).transpose()?;

        Ok(Self {
            merchant_id: raw.merchant_id,
            merchant_key: raw.merchant_key,
            order_number: raw.order_number,
            crypt_type,
            amount: raw.amount.as_ref().and_then(scalar_to_string),
            description: raw.description,
            payment_method,
            card_reference: raw.card_reference,
            card,
            transaction_reference: raw.transaction_reference,
            customer_id: raw.customer_id,
        })
    }

    /// Sets the store id and API token.
    pub fn with_credentials(
        mut self,
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
    ) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self.merchant_key = Some(merchant_key.into());
        self
    }

    /// Sets the order number.
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Sets the e-commerce indicator, either as a [`CryptType`] or a raw code.
    pub fn with_crypt_type(mut self, crypt_type: impl Into<i64>) -> Self {
        self.crypt_type = Some(crypt_type.into());
        self
    }

    /// Sets the amount.
    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Sets the dynamic descriptor.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the payment method.
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Sets the vault data key.
    pub fn with_card_reference(mut self, card_reference: impl Into<String>) -> Self {
        self.card_reference = Some(card_reference.into());
        self
    }

    /// Sets the card.
    pub fn with_card(mut self, card: CreditCard) -> Self {
        self.card = Some(card);
        self
    }

    /// Sets the reference of a prior transaction.
    pub fn with_transaction_reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction_reference = Some(reference.into());
        self
    }

    /// Sets the customer id.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}

impl From<CryptType> for i64 {
    fn from(crypt_type: CryptType) -> Self {
        i64::from(crypt_type.code())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParameters {
    merchant_id: Option<String>,
    merchant_key: Option<String>,
    order_number: Option<String>,
    crypt_type: Option<Value>,
    amount: Option<Value>,
    description: Option<String>,
    payment_method: Option<String>,
    card_reference: Option<String>,
    card: Option<RawCard>,
    transaction_reference: Option<String>,
    customer_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    number: Value,
    expiry_month: Value,
    expiry_year: Value,
    cvv: Option<Value>,
}

impl RawCard {
    fn into_card(self) -> Result<CreditCard> {
        let number = scalar_to_string(&self.number)
            .ok_or_else(|| MonerisError::validation("card", "number must be a string"))?;
        let month = scalar_to_string(&self.expiry_month)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| MonerisError::validation("card", "expiryMonth must be a number"))?;
        let year = scalar_to_string(&self.expiry_year)
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| MonerisError::validation("card", "expiryYear must be a number"))?;

        let mut card = CreditCard::new(number, month, year);
        card.cvv = self.cvv.as_ref().and_then(scalar_to_string);
        Ok(card)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
