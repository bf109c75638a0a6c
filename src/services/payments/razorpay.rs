use anyhow::Context;
use async_trait::async_trait;

use super::PaymentProvider;

pub struct RazorpayProvider {
    key_id: String,
    key_secret: String,
    client: reqwest::Client,
}

impl RazorpayProvider {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            key_id,
            key_secret,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> anyhow::Result<String> {
        anyhow::ensure!(
            !self.key_id.is_empty() && !self.key_secret.is_empty(),
            "payment provider credentials not configured"
        );

        let body: serde_json::Value = self
            .client
            .post("https://api.razorpay.com/v1/orders")
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .context("failed to reach payment provider")?
            .error_for_status()
            .context("payment provider rejected order")?
            .json()
            .await
            .context("invalid payment provider response")?;

        body.get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("payment provider response missing order id"))
    }
}
