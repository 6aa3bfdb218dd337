//! # moneris-rs
//!
//! A client for the Moneris e-commerce XML gateway.
//!
//! The crate turns a merchant's intent ("charge this card", "refund this
//! transaction", "store this card") into the gateway's XML request format,
//! posts it over HTTPS and classifies the XML reply into a normalized
//! outcome.
//!
//! ## Features
//!
//! - **Purchases and pre-authorizations** with raw cards or vaulted cards
//! - **Follow-up operations**: capture, refund and void from a prior receipt
//! - **Card vault**: store and delete cards
//! - **Pre-flight validation**: bad input is rejected before any I/O
//! - **Fail-open replies**: an unreadable reply still yields a queryable
//!   [`Response`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moneris_rs::gateway::{Gateway, GatewayConfig};
//! use moneris_rs::request::RequestParameters;
//! use moneris_rs::types::{CryptType, PaymentMethod};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(GatewayConfig::new("store1", "yesguy").with_test_mode(true));
//!
//! let response = gateway
//!     .purchase(
//!         RequestParameters::new()
//!             .with_payment_method(PaymentMethod::PaymentProfile)
//!             .with_card_reference("ot-abc123")
//!             .with_order_number("order-1001")
//!             .with_crypt_type(CryptType::SslEnabledMerchant)
//!             .with_amount("10.00"),
//!     )
//!     .send()
//!     .await?;
//!
//! if response.is_successful() {
//!     let reference = response.transaction_reference();
//!     println!("approved, keep {:?} for refunds", reference);
//! } else {
//!     println!("declined: {:?}", response.message());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Flow
//!
//! 1. **Parameters** are set on a [`RequestParameters`]
//! 2. **Validation** checks the fields the operation requires
//! 3. **Building** produces a single-line `request` document
//! 4. **Transport** posts it with `Content-Type: application/xml`
//! 5. **Interpretation** parses the `receipt` and applies the success rules
//!
//! ## Errors
//!
//! Input problems ([`MonerisError::Validation`],
//! [`MonerisError::InvalidPaymentMethod`],
//! [`MonerisError::InvalidTransactionReference`],
//! [`MonerisError::InvalidCard`]) are raised before the network call.
//! Transport problems are surfaced unchanged. A gateway decline is not an
//! error: it is a [`Response`] whose `is_successful()` is `false`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod card;
pub mod errors;
pub mod gateway;
pub mod messages;
pub mod receipt;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items
pub use card::{CardError, CreditCard};
pub use errors::{MonerisError, Result};
pub use gateway::{Gateway, GatewayConfig, TransactionRequest};
pub use receipt::Receipt;
pub use request::RequestParameters;
pub use response::Response;
pub use transport::{HttpTransport, Transport};
pub use types::{CryptType, Environment, Operation, PaymentMethod};
