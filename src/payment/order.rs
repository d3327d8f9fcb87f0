//! Order creation request handling.
//!
//! Amounts arrive in major units (rupees) and are sent to the gateway in
//! minor units (paise). The conversion uses `Decimal` so that values such
//! as `19.99` map to exactly `1999`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::PaymentError;
use crate::config::PaymentConfig;

/// Minor units per major unit.
const MINOR_UNITS: Decimal = Decimal::ONE_HUNDRED;

/// Body of `POST /order`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderRequest {
    /// Amount in major units, e.g. `499.50`
    #[schema(value_type = f64, example = 499.5)]
    pub amount: Option<Decimal>,
    /// ISO currency code, defaults to the configured currency
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    #[schema(example = "INR")]
    pub currency: Option<String>,
    /// Merchant receipt reference (Razorpay limit: 40 characters)
    #[validate(length(min = 1, max = 40, message = "receipt must be 1-40 characters"))]
    pub receipt: Option<String>,
}

/// Order payload as sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    /// Minor units (paise)
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

impl OrderRequest {
    pub fn into_new_order(
        self,
        config: &PaymentConfig,
        now_ms: i64,
    ) -> Result<NewOrder, PaymentError> {
        self.validate()
            .map_err(|e| PaymentError::InvalidOrder(e.to_string()))?;

        let amount = self.amount.ok_or(PaymentError::MissingField("amount"))?;
        Ok(NewOrder {
            amount: to_minor_units(amount)?,
            currency: self
                .currency
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| config.currency.clone()),
            receipt: self
                .receipt
                .unwrap_or_else(|| format!("{}{}", config.receipt_prefix, now_ms)),
        })
    }
}

/// Convert a major-unit amount to a positive whole number of minor units.
pub fn to_minor_units(amount: Decimal) -> Result<u64, PaymentError> {
    let minor = amount
        .checked_mul(MINOR_UNITS)
        .ok_or_else(|| PaymentError::InvalidAmount("amount is too large".to_string()))?;

    if minor <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    if !minor.fract().is_zero() {
        return Err(PaymentError::InvalidAmount(
            "amount supports at most two decimal places".to_string(),
        ));
    }

    minor
        .to_u64()
        .ok_or_else(|| PaymentError::InvalidAmount("amount is too large".to_string()))
}
