use serde::{Deserialize, Serialize};

use crate::{Metal, UtcDateTime, ValidationError};

/// Grams in one troy ounce, the mass unit precious metals are quoted in.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One metal's current price in both currencies and both units.
///
/// Field names on the wire match the dashboard contract: `priceUSD` is per
/// troy ounce, the `AltUnit` figures are per gram. All four prices are
/// rounded to 2 decimals at construction; a record either carries all four
/// or is never built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalPrice {
    pub metal: Metal,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    #[serde(rename = "priceUSDAltUnit")]
    pub price_usd_alt_unit: f64,
    #[serde(rename = "priceINR")]
    pub price_inr: f64,
    #[serde(rename = "priceINRAltUnit")]
    pub price_inr_alt_unit: f64,
    pub currency: String,
    #[serde(rename = "unitUSD")]
    pub unit_usd: String,
    #[serde(rename = "unitINR")]
    pub unit_inr: String,
    pub source: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: UtcDateTime,
}

impl MetalPrice {
    /// Build a record from a per-ounce USD price and a USD→INR rate.
    ///
    /// INR per gram derives from the already-rounded USD-per-gram figure,
    /// not from the raw per-ounce price.
    pub fn from_ounce_price(
        metal: Metal,
        usd_per_ounce: f64,
        rate: f64,
        source: impl Into<String>,
        as_of: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("priceUSD", usd_per_ounce)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::InvalidExchangeRate { value: rate });
        }

        let usd_per_gram = round2(usd_per_ounce / GRAMS_PER_TROY_OUNCE);
        let inr_per_ounce = round2(usd_per_ounce * rate);
        let inr_per_gram = round2(usd_per_gram * rate);

        Ok(Self {
            metal,
            price_usd: usd_per_ounce,
            price_usd_alt_unit: usd_per_gram,
            price_inr: inr_per_ounce,
            price_inr_alt_unit: inr_per_gram,
            currency: String::from("USD/INR"),
            unit_usd: String::from("oz"),
            unit_inr: String::from("gram"),
            source: source.into(),
            last_updated: as_of,
        })
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
