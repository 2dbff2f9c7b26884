pub mod dataset_cache;
pub mod error;
pub mod store;
