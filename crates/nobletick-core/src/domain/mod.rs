//! Domain types for normalized metal prices.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Metal`] | The fixed set of tracked metals, in canonical order |
//! | [`MetalPrice`] | One metal's price in USD/INR, per ounce/gram |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp |

mod metal;
mod models;
mod timestamp;

pub use metal::Metal;
pub use models::{round2, MetalPrice, GRAMS_PER_TROY_OUNCE};
pub use timestamp::UtcDateTime;
