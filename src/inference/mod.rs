pub mod classifier;
pub mod coerce;
pub mod temporal;
