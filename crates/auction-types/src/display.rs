//! Display conversions shared by every view.

use crate::model::Offer;
use crate::uint::Uint;
use time::macros::format_description;
use time::OffsetDateTime;

/// Rendered for timestamps outside the representable calendar range.
pub const INVALID_DATE: &str = "Invalid Date";

/// Human-readable UTC date for a seconds-since-epoch timestamp.
pub fn format_timestamp(secs: &Uint) -> String {
    let Some(secs) = secs.to_i64() else {
        return INVALID_DATE.to_string();
    };
    let Ok(at) = OffsetDateTime::from_unix_timestamp(secs) else {
        return INVALID_DATE.to_string();
    };
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day] [year] [hour]:[minute]:[second] UTC"
    );
    at.format(&format)
        .unwrap_or_else(|_| INVALID_DATE.to_string())
}

/// Suggested floor for the next offer: best price + 1. `None` when the
/// best offer already sits at the top of the range.
///
/// Advisory only; the contract decides what it accepts.
pub fn minimum_offer(best: &Offer) -> Option<Uint> {
    best.offer_price.checked_add(Uint::from(1u64))
}
