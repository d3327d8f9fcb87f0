use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::order::NewOrder;
use crate::config::Secret;
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "razorpay";

/// Payment gateway order creation. The created order is relayed verbatim.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<Value, UpstreamError>;
}

/// Razorpay Orders API client (`POST /v1/orders`, HTTP basic auth).
pub struct RazorpayClient {
    http: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: Secret,
}

impl RazorpayClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: Secret,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, order: &NewOrder) -> Result<Value, UpstreamError> {
        debug!(
            "[razorpay] Creating order amount={} currency={} receipt={}",
            order.amount, order.currency, order.receipt
        );
        let response = self
            .http
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(self.key_secret.expose()))
            .json(order)
            .send()
            .await?;
        read_json(SERVICE, response).await
    }
}
