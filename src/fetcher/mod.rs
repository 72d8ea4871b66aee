//! Page fetcher module
//!
//! Supports: store-native boundary detection, lookahead boundary detection
//!
//! # Overview
//!
//! A fetcher turns one `PageRequest` (page size plus optional cursor) into a
//! single range query and a `Page`. The two strategies differ only in how they
//! decide whether another page follows:
//!
//! - `ContinuationKeyFetcher` trusts the continuation key the store reports.
//!   Stores report it whenever the limit was hit, so a collection whose size
//!   is a multiple of the page size ends with an empty page.
//! - `LookaheadFetcher` asks for one extra record and only hands out a cursor
//!   when that sentinel exists. It is the default.

mod strategies;
mod types;

pub use strategies::{build_fetcher, ContinuationKeyFetcher, LookaheadFetcher};
pub use types::{parse_limit, BoundaryStrategy, PageFetcher, PageRequest};
