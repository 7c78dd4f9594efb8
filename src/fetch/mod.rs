use crate::error::Result;

pub mod candles;
pub mod quotes;

pub use candles::CandleFetcher;
pub use quotes::{ParsedQuote, ParsedQuoteSet, QuoteFetcher};

pub type FetchResult<T> = Result<T>;
