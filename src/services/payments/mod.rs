pub mod razorpay;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Smallest order the provider accepts, in minor units (paise).
pub const MIN_ORDER_AMOUNT: i64 = 100;

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates an order with the external provider and returns its order id.
    /// `amount_minor` is in the currency's minor unit.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> anyhow::Result<String>;
}

pub fn clamp_order_amount(amount: i64) -> i64 {
    amount.max(MIN_ORDER_AMOUNT)
}

/// Checks the callback signature: hex HMAC-SHA256 over `"{order_id}|{payment_id}"`
/// with the provider key secret. `Mac::verify_slice` gives a constant-time
/// compare. This is the only trusted signal that an online payment succeeded.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };
    mac.verify_slice(&sig_bytes).is_ok()
}
