//! Turning the extracted market-data tree into price records.

use serde_json::Value;

use crate::{Metal, MetalPrice, UtcDateTime};

/// Per-ounce USD price of the first (most recent) result entry.
///
/// Field priority is bid, then ask, then close; a field that is absent,
/// non-numeric, or zero is passed over. Returns `None` when no field
/// qualifies — such a metal is skipped entirely, never emitted with a
/// zero price.
fn ounce_price(result: &Value) -> Option<f64> {
    ["bid", "ask", "close"].iter().find_map(|field| {
        result
            .get(*field)
            .and_then(Value::as_f64)
            .filter(|price| *price != 0.0)
    })
}

/// Build price records for every metal present in the market-data tree.
///
/// Pure: the same tree and rate always yield the same records. Output
/// follows [`Metal::ALL`] order, not arrival order in the payload. Metals
/// without a non-empty `results` sequence, without a usable price field,
/// or failing record validation are skipped.
pub fn normalize(data: &Value, rate: f64, source: &str, as_of: UtcDateTime) -> Vec<MetalPrice> {
    Metal::ALL
        .iter()
        .filter_map(|&metal| {
            let result = data
                .get(metal.source_key())?
                .get("results")?
                .as_array()?
                .first()?;
            let usd_per_ounce = ounce_price(result)?;
            MetalPrice::from_ounce_price(metal, usd_per_ounce, rate, source, as_of).ok()
        })
        .collect()
}
