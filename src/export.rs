//! Offline artifacts: a coerced dataset and its column metadata written as JSON
//! files, so a dashboard can start without reaching the network.

use crate::inference::classifier::classify;
use crate::inference::coerce::coerce_in_place;
use crate::types::column_kind::{ColumnClassification, ColumnKind};
use crate::types::dataset::Dataset;
use crate::types::vocabulary::FieldVocabulary;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File holding the JSON array of records.
pub const DATA_FILE_NAME: &str = "time-series-data.json";
/// File holding [`DatasetMetadata`].
pub const METADATA_FILE_NAME: &str = "time-series-metadata.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to encode offline artifact")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode offline artifact '{0}'")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Unknown type tag '{tag}' for column '{column}'")]
    UnknownTypeTag { column: String, tag: String },
}

/// Contents of `time-series-metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_rows: usize,
    /// Column name → `"number"`, `"date"` or `"string"`.
    pub columns: BTreeMap<String, String>,
    pub last_updated: DateTime<Utc>,
}

impl DatasetMetadata {
    pub fn new(dataset: &Dataset, classification: &ColumnClassification) -> Self {
        Self {
            total_rows: dataset.len(),
            columns: classification.type_tags(),
            last_updated: Utc::now(),
        }
    }

    /// Rebuilds a classification from the stored tags, in the order of `columns`.
    ///
    /// Without a `"date"` column the first column is the time axis again.
    pub fn classification(&self, columns: &[String]) -> Result<ColumnClassification, ExportError> {
        let mut classification = ColumnClassification::new();
        for column in columns {
            let Some(tag) = self.columns.get(column) else {
                continue;
            };
            let kind = ColumnKind::from_type_tag(tag).ok_or_else(|| ExportError::UnknownTypeTag {
                column: column.clone(),
                tag: tag.clone(),
            })?;
            classification.set(column.clone(), kind);
        }
        if classification.temporal_columns().is_empty() {
            if let Some(first) = columns.first() {
                classification.set_time_column(first.clone());
            }
        }
        Ok(classification)
    }
}

/// Writes [`DATA_FILE_NAME`] and [`METADATA_FILE_NAME`] into `dir`, creating it
/// if needed.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the directory or a file cannot be written and
/// [`ExportError::Encode`] if serialization fails.
pub async fn write_offline_artifacts(
    dir: &Path,
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> Result<DatasetMetadata, ExportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ExportError::Io(dir.to_path_buf(), e))?;

    let metadata = DatasetMetadata::new(dataset, classification);
    let data_json = serde_json::to_string_pretty(dataset).map_err(ExportError::Encode)?;
    let metadata_json = serde_json::to_string_pretty(&metadata).map_err(ExportError::Encode)?;

    let data_path = dir.join(DATA_FILE_NAME);
    tokio::fs::write(&data_path, data_json)
        .await
        .map_err(|e| ExportError::Io(data_path.clone(), e))?;
    let metadata_path = dir.join(METADATA_FILE_NAME);
    tokio::fs::write(&metadata_path, metadata_json)
        .await
        .map_err(|e| ExportError::Io(metadata_path.clone(), e))?;

    info!(
        "Wrote {} rows and {} column tags to {}",
        metadata.total_rows,
        metadata.columns.len(),
        dir.display()
    );
    Ok(metadata)
}

/// Reads artifacts written by [`write_offline_artifacts`] and restores the
/// coerced dataset.
///
/// Column kinds come from the metadata file. When it is missing the dataset is
/// classified with `vocabulary` instead.
pub async fn read_offline_artifacts(
    dir: &Path,
    vocabulary: &FieldVocabulary,
) -> Result<(Dataset, ColumnClassification), ExportError> {
    let data_path = dir.join(DATA_FILE_NAME);
    let data_json = tokio::fs::read_to_string(&data_path)
        .await
        .map_err(|e| ExportError::Io(data_path.clone(), e))?;
    let mut dataset: Dataset =
        serde_json::from_str(&data_json).map_err(|e| ExportError::Decode(data_path, e))?;

    let metadata_path = dir.join(METADATA_FILE_NAME);
    let classification = match tokio::fs::read_to_string(&metadata_path).await {
        Ok(metadata_json) => {
            let metadata: DatasetMetadata = serde_json::from_str(&metadata_json)
                .map_err(|e| ExportError::Decode(metadata_path, e))?;
            if metadata.total_rows != dataset.len() {
                warn!(
                    "Metadata reports {} rows but data file holds {}",
                    metadata.total_rows,
                    dataset.len()
                );
            }
            metadata.classification(&dataset.columns())?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("No metadata file in {}, classifying from data", dir.display());
            classify(&dataset, vocabulary)
        }
        Err(e) => return Err(ExportError::Io(metadata_path, e)),
    };

    coerce_in_place(&mut dataset, &classification);
    Ok((dataset, classification))
}
