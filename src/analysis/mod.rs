//! Read-only views over a coerced dataset: statistics, correlation, daily
//! buckets, table helpers, display units and a polars frame.

pub mod buckets;
pub mod correlation;
pub mod frame;
pub mod summary;
pub mod table;
pub mod units;
