pub mod card;
pub mod earnings;

pub use card::{CardSequence, DisplayCard, RefreshResponse};
pub use earnings::{DateGroupMap, GroupedEntry, RawEarningsRecord};
