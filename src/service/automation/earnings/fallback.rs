use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::models::{CardSequence, DisplayCard};
use crate::service::automation::earnings::transform::header_subtitle;

/// Static board body served when live data is unavailable.
static FALLBACK_BODY: Lazy<CardSequence> = Lazy::new(|| {
    vec![
        DisplayCard::day_label("Monday", 1),
        DisplayCard::company("AAPL", "Apple Inc.", Some(2.1)),
        DisplayCard::company("MSFT", "Microsoft Corporation", Some(2.78)),
        DisplayCard::separator(),
        DisplayCard::day_label("Tuesday", 2),
        DisplayCard::company("GOOGL", "Alphabet Inc.", Some(1.59)),
        DisplayCard::company("JPM", "JPMorgan Chase & Co.", Some(3.96)),
        DisplayCard::separator(),
        DisplayCard::day_label("Wednesday", 3),
        DisplayCard::company("AMZN", "Amazon.com, Inc.", Some(0.8)),
        DisplayCard::company("NVDA", "NVIDIA Corporation", None),
    ]
});

/// Well-formed board with a live header and the static body.
pub fn fallback(today: NaiveDate) -> CardSequence {
    let mut cards = Vec::with_capacity(FALLBACK_BODY.len() + 2);
    cards.push(DisplayCard::header(header_subtitle(today)));
    cards.push(DisplayCard::note());
    cards.extend(FALLBACK_BODY.iter().cloned());
    cards
}
