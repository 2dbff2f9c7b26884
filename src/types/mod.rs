pub mod column_kind;
pub mod dataset;
pub mod record;
pub mod value;
pub mod vocabulary;
