use crate::cache::error::CacheError;
use crate::cache::store::KeyValueStore;
use crate::inference::classifier::classify;
use crate::inference::coerce::coerce_in_place;
use crate::inference::temporal::parse_temporal;
use crate::types::dataset::Dataset;
use crate::types::value::{to_iso_string, Value};
use crate::types::vocabulary::FieldVocabulary;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

/// Store key holding the JSON array of records.
pub const DATA_KEY: &str = "timeSeriesData";
/// Store key holding the ISO-8601 capture time.
pub const TIMESTAMP_KEY: &str = "timeSeriesDataTimestamp";
/// How long a cached dataset is reused before a re-fetch is due.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::hours(1);

/// Caches a coerced [`Dataset`] in a [`KeyValueStore`] with a capture timestamp.
///
/// The storage format is text-only: timestamps are written as ISO-8601 strings
/// and restored on [`load`](Self::load), after which the dataset is
/// re-classified and re-coerced.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{DatasetCache, MemoryStore, parse_csv};
///
/// let cache = DatasetCache::new(MemoryStore::new());
/// assert!(!cache.is_fresh());
///
/// let dataset = parse_csv("timestamp,solar\n2024-01-01T00:00:00Z,12.3\n").unwrap();
/// cache.save(&dataset).unwrap();
/// assert!(cache.is_fresh());
/// assert_eq!(cache.load().map(|d| d.len()), Some(1));
///
/// cache.invalidate().unwrap();
/// assert!(cache.load().is_none());
/// ```
#[derive(Debug)]
pub struct DatasetCache<S: KeyValueStore> {
    store: S,
    freshness_window: Duration,
    vocabulary: FieldVocabulary,
}

impl<S: KeyValueStore> DatasetCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            vocabulary: FieldVocabulary::default(),
        }
    }

    pub fn with_freshness_window(mut self, freshness_window: Duration) -> Self {
        self.freshness_window = freshness_window;
        self
    }

    /// Vocabulary used to re-classify datasets on load.
    pub fn with_vocabulary(mut self, vocabulary: FieldVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Stores `dataset` with the current time as capture timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if encoding fails or the store refuses the write
    /// (e.g. [`CacheError::QuotaExceeded`]). Nothing panics; callers are
    /// expected to treat the failure as soft.
    pub fn save(&self, dataset: &Dataset) -> Result<(), CacheError> {
        self.save_at(dataset, Utc::now())
    }

    /// [`save`](Self::save) with an explicit capture time.
    pub fn save_at(&self, dataset: &Dataset, captured_at: DateTime<Utc>) -> Result<(), CacheError> {
        let serialized = serde_json::to_string(dataset).map_err(CacheError::CacheEncode)?;
        // Data must never sit next to an older capture time.
        self.store.remove(TIMESTAMP_KEY)?;
        self.store.set(DATA_KEY, &serialized)?;
        if let Err(e) = self.store.set(TIMESTAMP_KEY, &to_iso_string(&captured_at)) {
            if let Err(remove_err) = self.store.remove(DATA_KEY) {
                warn!("Failed to drop untimestamped cache data: {}", remove_err);
            }
            return Err(e);
        }
        info!(
            "Cached {} records ({} bytes) at {}",
            dataset.len(),
            serialized.len(),
            captured_at
        );
        Ok(())
    }

    /// Reads the cached dataset back, or `None` if there is none or it cannot
    /// be decoded. Failures are logged, not returned.
    pub fn load(&self) -> Option<Dataset> {
        match self.try_load() {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Ignoring unreadable cached dataset: {}", e);
                None
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces the reason a cached entry could
    /// not be used.
    pub fn try_load(&self) -> Result<Option<Dataset>, CacheError> {
        let Some(serialized) = self.store.get(DATA_KEY)? else {
            debug!("Cache miss: no '{}' entry", DATA_KEY);
            return Ok(None);
        };

        let mut dataset: Dataset = serde_json::from_str(&serialized)
            .map_err(|e| CacheError::CacheDecode(DATA_KEY.to_string(), e))?;

        for record in dataset.records_mut() {
            for (column, value) in record.iter_mut() {
                if !self.vocabulary.is_temporal_name(column) {
                    continue;
                }
                if let Some(dt) = value.as_text().and_then(parse_temporal) {
                    *value = Value::Temporal(dt);
                }
            }
        }

        let classification = classify(&dataset, &self.vocabulary);
        coerce_in_place(&mut dataset, &classification);
        debug!("Cache hit: restored {} records", dataset.len());
        Ok(Some(dataset))
    }

    /// The stored capture time, if any and if it parses.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        let raw = match self.store.get(TIMESTAMP_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read cache timestamp: {}", e);
                return None;
            }
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// Whether the cached dataset is younger than the freshness window.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    /// [`is_fresh`](Self::is_fresh) evaluated at `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.captured_at()
            .is_some_and(|captured_at| now - captured_at < self.freshness_window)
    }

    /// Removes both cache entries. Used before a forced refresh.
    pub fn invalidate(&self) -> Result<(), CacheError> {
        self.store.remove(DATA_KEY)?;
        self.store.remove(TIMESTAMP_KEY)?;
        info!("Cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use crate::inference::coerce::coerce;
    use crate::source::parser::parse_csv;
    use chrono::TimeZone;

    fn coerced_dataset() -> Dataset {
        let dataset = parse_csv(
            "timestamp,solar,station,windDirection\n\
             2024-01-01T00:00:00Z,12.3,ML-417,N\n\
             2024-01-01T01:00:00Z,abc,ML-418,180\n\
             not a date,4,ML-419,\n",
        )
        .unwrap();
        let classification = classify(&dataset, &FieldVocabulary::default());
        coerce(&dataset, &classification)
    }

    #[test]
    fn test_round_trip() -> Result<(), CacheError> {
        let cache = DatasetCache::new(MemoryStore::new());
        let dataset = coerced_dataset();
        cache.save(&dataset)?;

        let loaded = cache.try_load()?.expect("dataset was just saved");
        assert_eq!(loaded, dataset);
        assert_eq!(loaded.columns(), ["timestamp", "solar", "station", "windDirection"]);
        assert_eq!(
            loaded.records()[2].get("timestamp"),
            Some(&Value::text("not a date"))
        );
        Ok(())
    }

    #[test]
    fn test_round_trip_restores_fallback_temporal_column() -> Result<(), CacheError> {
        let dataset = parse_csv("when,reading\n2024-05-01,1\n2024-05-02,2\n").unwrap();
        let dataset = coerce(&dataset, &classify(&dataset, &FieldVocabulary::default()));
        assert!(dataset.records()[0].get("when").unwrap().as_temporal().is_some());

        let cache = DatasetCache::new(MemoryStore::new());
        cache.save(&dataset)?;
        assert_eq!(cache.load(), Some(dataset));
        Ok(())
    }

    #[test]
    fn test_freshness_boundary() -> Result<(), CacheError> {
        let cache = DatasetCache::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        cache.save_at(&coerced_dataset(), now - Duration::minutes(59))?;
        assert!(cache.is_fresh_at(now));

        cache.save_at(&coerced_dataset(), now - Duration::minutes(61))?;
        assert!(!cache.is_fresh_at(now));

        cache.save_at(&coerced_dataset(), now - Duration::minutes(60))?;
        assert!(!cache.is_fresh_at(now));
        Ok(())
    }

    #[test]
    fn test_custom_freshness_window() -> Result<(), CacheError> {
        let cache =
            DatasetCache::new(MemoryStore::new()).with_freshness_window(Duration::minutes(5));
        let now = Utc::now();
        cache.save_at(&coerced_dataset(), now - Duration::minutes(6))?;
        assert!(!cache.is_fresh_at(now));
        Ok(())
    }

    #[test]
    fn test_missing_or_garbage_entries() -> Result<(), CacheError> {
        let store = MemoryStore::new();
        let cache = DatasetCache::new(store);
        assert!(cache.load().is_none());
        assert!(!cache.is_fresh());

        cache.store().set(DATA_KEY, "{not json")?;
        cache.store().set(TIMESTAMP_KEY, "yesterday")?;
        assert!(cache.load().is_none());
        assert!(matches!(cache.try_load(), Err(CacheError::CacheDecode(_, _))));
        assert!(!cache.is_fresh());
        Ok(())
    }

    #[test]
    fn test_quota_failure_is_reported() {
        let cache = DatasetCache::new(MemoryStore::with_quota(16));
        let result = cache.save(&coerced_dataset());
        assert!(matches!(result, Err(CacheError::QuotaExceeded { .. })));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_failed_timestamp_write_leaves_no_data() -> Result<(), Box<dyn std::error::Error>> {
        let small = parse_csv("timestamp,solar\n2024-01-01T00:00:00Z,1\n")?;
        let large = parse_csv(
            "timestamp,solar\n\
             2024-01-01T00:00:00Z,1\n\
             2024-01-01T01:00:00Z,2\n\
             2024-01-01T02:00:00Z,3\n\
             2024-01-01T03:00:00Z,4\n\
             2024-01-01T04:00:00Z,5\n",
        )?;
        // Room for the large dataset alone, but not for its timestamp as well.
        let quota = serde_json::to_string(&large)?.len() + 10;
        let cache = DatasetCache::new(MemoryStore::with_quota(quota));
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        cache.save_at(&small, now - Duration::minutes(5))?;
        assert!(cache.is_fresh_at(now));

        let result = cache.save_at(&large, now);
        assert!(matches!(result, Err(CacheError::QuotaExceeded { .. })));
        assert_eq!(cache.store().get(DATA_KEY)?, None);
        assert!(!cache.is_fresh_at(now));
        assert!(cache.load().is_none());
        Ok(())
    }

    #[test]
    fn test_invalidate_removes_both_keys() -> Result<(), CacheError> {
        let cache = DatasetCache::new(MemoryStore::new());
        cache.save(&coerced_dataset())?;
        cache.invalidate()?;
        assert_eq!(cache.store().get(DATA_KEY)?, None);
        assert_eq!(cache.store().get(TIMESTAMP_KEY)?, None);
        assert!(!cache.is_fresh());
        Ok(())
    }

    #[test]
    fn test_numeric_strings_are_recoerced_on_load() -> Result<(), CacheError> {
        let cache = DatasetCache::new(MemoryStore::new());
        cache.store().set(
            DATA_KEY,
            r#"[{"Date":"2024-01-01T00:00:00.000Z","airTemperature":"21.5"}]"#,
        )?;
        let loaded = cache.try_load()?.expect("entry present");
        assert_eq!(
            loaded.records()[0].get("airTemperature"),
            Some(&Value::Number(21.5))
        );
        assert_eq!(
            loaded.records()[0].get("Date"),
            Some(&Value::Temporal(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
        );
        Ok(())
    }
}
