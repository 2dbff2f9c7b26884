mod analysis;
mod cache;
mod data_service;
mod error;
mod export;
mod inference;
mod sample;
mod source;
mod types;
mod utils;

pub use data_service::*;
pub use error::DashboardError;

pub use types::column_kind::{ColumnClassification, ColumnKind};
pub use types::dataset::Dataset;
pub use types::record::Record;
pub use types::value::{parse_number, to_iso_string, Value, ValueKind};
pub use types::vocabulary::FieldVocabulary;

pub use source::error::{FetchError, ParseError};
pub use source::fetcher::CsvFetcher;
pub use source::parser::parse_csv;

pub use inference::classifier::{classify, SAMPLE_ROWS};
pub use inference::coerce::{coerce, coerce_in_place};
pub use inference::temporal::parse_temporal;

pub use cache::dataset_cache::*;
pub use cache::error::CacheError;
pub use cache::store::{FileStore, KeyValueStore, MemoryStore};

pub use export::*;
pub use sample::*;

pub use analysis::buckets::*;
pub use analysis::correlation::*;
pub use analysis::frame::*;
pub use analysis::summary::*;
pub use analysis::table::*;
pub use analysis::units::*;
