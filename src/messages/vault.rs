//! Vault operations: storing and removing cards.

use super::{crypt_type_text, Transaction};
use crate::errors::{MonerisError, Result};
use crate::request::RequestParameters;
use crate::validation::{validate, Field};
use serde::Serialize;

/// Operation element for adding a card to the vault.
#[derive(Debug, Serialize)]
pub struct AddCardTransaction {
    /// Merchant's customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<String>,
    /// Card number
    pub pan: String,
    /// Expiry, `YYMM`
    pub expdate: String,
    /// E-commerce indicator
    pub crypt_type: String,
}

/// Operation element for removing a card from the vault.
#[derive(Debug, Serialize)]
pub struct DeleteCardTransaction {
    /// Vault data key
    pub data_key: String,
}

/// Builds a `res_add_cc` element.
pub fn create_card(params: &RequestParameters) -> Result<Transaction> {
    validate(params, &[Field::Card, Field::CryptType])?;
    let card = params
        .card
        .as_ref()
        .ok_or_else(|| MonerisError::validation("card", "parameter is required"))?;
    card.validate()?;

    Ok(Transaction::ResAddCc(AddCardTransaction {
        cust_id: params.customer_id.clone().filter(|id| !id.is_empty()),
        pan: card.number.clone(),
        expdate: card.expiry_date_yymm(),
        crypt_type: crypt_type_text(params),
    }))
}

/// Builds a `res_delete` element.
pub fn delete_card(params: &RequestParameters) -> Result<Transaction> {
    validate(params, &[Field::CardReference])?;

    Ok(Transaction::ResDelete(DeleteCardTransaction {
        data_key: params.card_reference.clone().unwrap_or_default(),
    }))
}
