//! Payment card value object.
//!
//! The card validates itself; message builders only call [`CreditCard::validate`]
//! and read the number, expiry and security code.

use chrono::{Datelike, Utc};
use std::fmt;
use thiserror::Error;

/// Reasons a card can be rejected before it is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Card number is empty or contains non-digits
    #[error("card number must contain only digits")]
    InvalidNumber,

    /// Card number has the wrong number of digits
    #[error("card number must be between 12 and 19 digits")]
    InvalidLength,

    /// Card number fails the Luhn checksum
    #[error("card number is invalid")]
    InvalidChecksum,

    /// Expiry month outside 1-12
    #[error("expiry month must be between 1 and 12")]
    InvalidExpiryMonth,

    /// Card expired before the current month
    #[error("card has expired")]
    Expired,
}

/// A card presented for payment or for storage in the vault.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    /// Primary account number, digits only
    pub number: String,

    /// Expiry month (1-12)
    pub expiry_month: u32,

    /// Four-digit expiry year
    pub expiry_year: i32,

    /// Card verification value
    pub cvv: Option<String>,
}

impl CreditCard {
    /// Creates a new card.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneris_rs::card::CreditCard;
    ///
    /// let card = CreditCard::new("4242424242424242", 12, 2030).with_cvv("123");
    /// assert_eq!(card.expiry_date_yymm(), "3012");
    /// ```
    pub fn new(number: impl Into<String>, expiry_month: u32, expiry_year: i32) -> Self {
        Self {
            number: number.into(),
            expiry_month,
            expiry_year,
            cvv: None,
        }
    }

    /// Sets the card verification value.
    pub fn with_cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    /// Checks the number and the expiry date.
    pub fn validate(&self) -> Result<(), CardError> {
        if self.number.is_empty() || !self.number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardError::InvalidNumber);
        }
        if !(12..=19).contains(&self.number.len()) {
            return Err(CardError::InvalidLength);
        }
        if !luhn_valid(&self.number) {
            return Err(CardError::InvalidChecksum);
        }
        if !(1..=12).contains(&self.expiry_month) {
            return Err(CardError::InvalidExpiryMonth);
        }

        let now = Utc::now();
        if (self.expiry_year, self.expiry_month) < (now.year(), now.month()) {
            return Err(CardError::Expired);
        }

        Ok(())
    }

    /// Expiry in the gateway's `YYMM` form.
    pub fn expiry_date_yymm(&self) -> String {
        format!(
            "{:02}{:02}",
            self.expiry_year.rem_euclid(100),
            self.expiry_month
        )
    }

    /// Last four digits of the number.
    pub fn last_four(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        self.number.get(start..).unwrap_or_default()
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &format_args!("****{}", self.last_four()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &self.cvv.as_ref().map(|_| "***"))
            .finish()
    }
}

fn luhn_valid(number: &str) -> bool {
    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_year() -> i32 {
        Utc::now().year() + 1
    }

    #[test]
    fn test_valid_card() {
        let card = CreditCard::new("4242424242424242", 12, next_year()).with_cvv("123");
        assert_eq!(card.validate(), Ok(()));
    }

    #[test]
    fn test_expired_card() {
        let now = Utc::now();
        let card = CreditCard::new("4242424242424242", now.month(), now.year() - 1);
        assert_eq!(card.validate(), Err(CardError::Expired));
    }

    #[test]
    fn test_current_month_is_not_expired() {
        let now = Utc::now();
        let card = CreditCard::new("4242424242424242", now.month(), now.year());
        assert_eq!(card.validate(), Ok(()));
    }

    #[test]
    fn test_bad_numbers() {
        let year = next_year();
        assert_eq!(
            CreditCard::new("4242-4242", 1, year).validate(),
            Err(CardError::InvalidNumber)
        );
        assert_eq!(
            CreditCard::new("42424242", 1, year).validate(),
            Err(CardError::InvalidLength)
        );
        assert_eq!(
            CreditCard::new("4242424242424241", 1, year).validate(),
            Err(CardError::InvalidChecksum)
        );
        assert_eq!(
            CreditCard::new("4242424242424242", 13, year).validate(),
            Err(CardError::InvalidExpiryMonth)
        );
    }

    #[test]
    fn test_expiry_format() {
        assert_eq!(CreditCard::new("4242424242424242", 3, 2029).expiry_date_yymm(), "2903");
    }

    #[test]
    fn test_debug_masks_number() {
        let card = CreditCard::new("4242424242424242", 3, 2029).with_cvv("987");
        let debug = format!("{:?}", card);
        assert!(debug.contains("****4242"));
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("987"));
    }
}
