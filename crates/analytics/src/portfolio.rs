use crate::currency::convert;
use crate::error::AnalyticsError;
use core_types::RateTable;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// How many units of a metal an amount of money buys at the latest price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioQuote {
    pub metal: String,
    pub amount: Decimal,
    pub currency: String,
    /// Latest price in `currency`, rounded to cents.
    pub unit_price: Decimal,
    /// Units purchasable, rounded to four decimal places.
    pub units: Decimal,
}

impl PortfolioQuote {
    /// Prices `amount` (denominated in `currency`) against the metal's latest
    /// USD price converted into the same currency.
    pub fn quote(
        metal: &str,
        amount: f64,
        latest_usd: f64,
        rates: &RateTable,
        currency: &str,
    ) -> Result<Self, AnalyticsError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "investment amount must be a positive number, got {}",
                amount
            )));
        }

        let unit_price = convert(latest_usd, rates, currency);
        if unit_price <= 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "latest price of {} is zero; no units can be quoted",
                metal
            )));
        }
        let units = amount / unit_price;

        Ok(Self {
            metal: metal.to_string(),
            amount: to_decimal(amount, 2)?,
            currency: currency.to_ascii_uppercase(),
            unit_price: to_decimal(unit_price, 2)?,
            units: to_decimal(units, 4)?,
        })
    }
}

fn to_decimal(value: f64, dp: u32) -> Result<Decimal, AnalyticsError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| AnalyticsError::InvalidInput(format!("{} cannot be represented as a decimal", value)))
}
