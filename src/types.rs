//! Core type definitions for the Moneris gateway.
//!
//! Closed enumerations for the values the gateway accepts, plus the public
//! endpoint URLs.

use crate::errors::MonerisError;
use std::fmt;
use std::str::FromStr;

/// Public QA (sandbox) endpoint of the Moneris XML API.
pub const SANDBOX_ENDPOINT: &str = "https://esqa.moneris.com/gateway2/servlet/MpgRequest";

/// Public production endpoint of the Moneris XML API.
pub const PRODUCTION_ENDPOINT: &str = "https://www3.moneris.com/gateway2/servlet/MpgRequest";

/// How the card is supplied to a purchase or authorization.
///
/// # Examples
///
/// ```
/// use moneris_rs::types::PaymentMethod;
///
/// let method: PaymentMethod = "payment_profile".parse().unwrap();
/// assert_eq!(method, PaymentMethod::PaymentProfile);
/// assert!("test".parse::<PaymentMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Raw card data sent with the transaction
    Card,
    /// A card stored in the gateway vault, referenced by its data key
    PaymentProfile,
}

impl PaymentMethod {
    /// Wire name of the payment method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::PaymentProfile => "payment_profile",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = MonerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "payment_profile" => Ok(PaymentMethod::PaymentProfile),
            other => Err(MonerisError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// E-commerce indicator: the authentication context of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CryptType {
    /// Mail/telephone order, single transaction
    MailOrderSingle = 1,
    /// Mail/telephone order, recurring
    MailOrderRecurring = 2,
    /// Mail/telephone order, instalment
    MailOrderInstalment = 3,
    /// Mail/telephone order, unknown classification
    MailOrderUnknown = 4,
    /// Authenticated e-commerce (3-D Secure)
    AuthenticatedEcommerce = 5,
    /// Non-authenticated e-commerce (3-D Secure attempted)
    NonAuthenticatedEcommerce = 6,
    /// SSL-enabled merchant
    SslEnabledMerchant = 7,
}

impl CryptType {
    /// Numeric code sent on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CryptType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CryptType::MailOrderSingle),
            2 => Ok(CryptType::MailOrderRecurring),
            3 => Ok(CryptType::MailOrderInstalment),
            4 => Ok(CryptType::MailOrderUnknown),
            5 => Ok(CryptType::AuthenticatedEcommerce),
            6 => Ok(CryptType::NonAuthenticatedEcommerce),
            7 => Ok(CryptType::SslEnabledMerchant),
            other => Err(other),
        }
    }
}

/// Card verification data indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CvdIndicator {
    /// CVD deliberately bypassed or not provided by the merchant
    Bypassed = 0,
    /// CVD value is present
    Present = 1,
    /// CVD is on the card but illegible
    Illegible = 2,
    /// Cardholder states the card has no CVD imprint
    NoCvd = 9,
}

impl CvdIndicator {
    /// Numeric code sent on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// The operations the gateway client can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Charge a card or a stored profile
    Purchase,
    /// Return funds from a prior purchase or capture
    Refund,
    /// Cancel a prior transaction
    Void,
    /// Store a card in the vault
    CreateCard,
    /// Remove a stored card from the vault
    DeleteCard,
    /// Reserve funds without capturing them
    Authorize,
    /// Capture funds reserved by an authorization
    Capture,
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Purchase => "purchase",
            Operation::Refund => "refund",
            Operation::Void => "void",
            Operation::CreateCard => "create_card",
            Operation::DeleteCard => "delete_card",
            Operation::Authorize => "authorize",
            Operation::Capture => "capture",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which gateway host a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// QA host, used in test mode
    Sandbox,
    /// Live host
    Production,
}

impl Environment {
    /// Selects the environment from a test-mode flag.
    pub fn from_test_mode(test_mode: bool) -> Self {
        if test_mode {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(PaymentMethod::PaymentProfile.to_string(), "payment_profile");

        let err = "Card".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, MonerisError::InvalidPaymentMethod(ref m) if m == "Card"));
    }

    #[test]
    fn test_crypt_type_codes() {
        for code in 1..=7u8 {
            let crypt = CryptType::try_from(code).unwrap();
            assert_eq!(crypt.code(), code);
        }
        assert_eq!(CryptType::try_from(0), Err(0));
        assert_eq!(CryptType::try_from(8), Err(8));
    }

    #[test]
    fn test_cvd_codes() {
        assert_eq!(CvdIndicator::Present.code(), 1);
        assert_eq!(CvdIndicator::NoCvd.code(), 9);
    }

    #[test]
    fn test_environment_selection() {
        assert_eq!(Environment::from_test_mode(true), Environment::Sandbox);
        assert_eq!(Environment::from_test_mode(false), Environment::Production);
    }
}
