pub mod loader;
pub mod series;

pub use loader::{from_records, parse_records, RawRecord};
pub use series::{PriceBar, PriceSeries};
