use anyhow::Context;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct PincodeInfo {
    pub district: String,
    pub state: String,
}

/// District/state enrichment from a 6-digit PIN code. Failures are treated
/// as non-critical by callers; a booking proceeds with blank fields.
#[async_trait]
pub trait PincodeLookup: Send + Sync {
    async fn lookup(&self, pincode: &str) -> anyhow::Result<Option<PincodeInfo>>;
}

pub struct PostalPincodeClient {
    client: reqwest::Client,
}

impl PostalPincodeClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for PostalPincodeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PincodeLookup for PostalPincodeClient {
    async fn lookup(&self, pincode: &str) -> anyhow::Result<Option<PincodeInfo>> {
        let url = format!("https://api.postalpincode.in/pincode/{pincode}");
        let body: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to reach pincode service")?
            .json()
            .await
            .context("invalid pincode service response")?;

        let first = match body.as_array().and_then(|a| a.first()) {
            Some(v) => v,
            None => return Ok(None),
        };
        if first.get("Status").and_then(|s| s.as_str()) != Some("Success") {
            return Ok(None);
        }

        let office = match first
            .get("PostOffice")
            .and_then(|p| p.as_array())
            .and_then(|a| a.first())
        {
            Some(o) => o,
            None => return Ok(None),
        };

        let district = office
            .get("District")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let state = office
            .get("State")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Some(PincodeInfo { district, state }))
    }
}
