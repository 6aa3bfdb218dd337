//! Example purchase followed by a refund.
//!
//! Run with:
//! ```bash
//! cargo run --example purchase
//! ```
//!
//! Environment variables (a `.env` file is read if present):
//! - MONERIS_STORE_ID / MONERIS_API_TOKEN: store credentials (QA defaults used if unset)
//! - MONERIS_TEST_MODE: send to the QA host (defaults to true here)
//! - MONERIS_DATA_KEY: vaulted card to charge; a test card is used otherwise

use moneris_rs::{CreditCard, CryptType, Gateway, GatewayConfig, PaymentMethod, RequestParameters};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("{}, using the public QA store", e);
            GatewayConfig::new("store5", "yesguy").with_test_mode(true)
        }
    };

    println!("Moneris example");
    println!("   store: {}", config.merchant_id);
    println!("   test mode: {}", config.test_mode);

    let gateway = Gateway::new(config);
    let order_number = format!("demo-{}", chrono::Utc::now().timestamp());

    let params = RequestParameters::new()
        .with_order_number(&order_number)
        .with_crypt_type(CryptType::SslEnabledMerchant)
        .with_amount("10.00")
        .with_description("Demo purchase");

    let params = match std::env::var("MONERIS_DATA_KEY") {
        Ok(data_key) => params
            .with_payment_method(PaymentMethod::PaymentProfile)
            .with_card_reference(data_key),
        Err(_) => params
            .with_payment_method(PaymentMethod::Card)
            .with_card(CreditCard::new("4242424242424242", 12, 2030).with_cvv("123")),
    };

    let purchase = gateway.purchase(params).send().await?;
    println!("purchase: successful={} message={:?}", purchase.is_successful(), purchase.message());
    println!("   reply: {}", purchase.data());

    let Some(reference) = purchase.transaction_reference() else {
        println!("no receipt to refund");
        return Ok(());
    };

    let refund = gateway
        .refund(
            RequestParameters::new()
                .with_amount("10.00")
                .with_crypt_type(CryptType::SslEnabledMerchant)
                .with_transaction_reference(reference),
        )
        .send()
        .await?;
    println!("refund: successful={} message={:?}", refund.is_successful(), refund.message());

    Ok(())
}
