//! The main entry point: loads the station dataset from the cache or the
//! network, infers column kinds, coerces values and publishes the result.

use crate::cache::dataset_cache::{DatasetCache, DEFAULT_FRESHNESS_WINDOW};
use crate::cache::store::{FileStore, KeyValueStore};
use crate::error::DashboardError;
use crate::export::read_offline_artifacts;
use crate::inference::classifier::classify;
use crate::inference::coerce::coerce_in_place;
use crate::sample::{generate_sample_dataset, DEFAULT_SAMPLE_ROWS};
use crate::source::error::ParseError;
use crate::source::fetcher::CsvFetcher;
use crate::source::parser::parse_csv;
use crate::types::column_kind::ColumnClassification;
use crate::types::dataset::Dataset;
use crate::types::vocabulary::FieldVocabulary;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where the station CSV is downloaded from unless overridden.
pub const DEFAULT_SOURCE_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/ML-417ADS_125416523_3-FsSETybgez6hFyBBY5nnjA1Ex50wn6.csv";

/// How a [`LoadedDataset`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// A fresh entry in the dataset cache.
    Cache,
    /// Downloaded and parsed from the source URL.
    Network,
    /// Read from previously exported offline artifacts.
    Offline,
    /// Synthetic sample data.
    Sample,
}

/// What the dashboard consumes: coerced records plus their column kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub classification: ColumnClassification,
    pub origin: DataOrigin,
    /// Ticket of the load that produced this dataset.
    pub generation: u64,
}

/// Outcome of publishing a finished load into a [`LatestDataset`].
#[derive(Debug, Clone)]
pub enum Published {
    /// This load is now the latest dataset.
    Current(Arc<LoadedDataset>),
    /// A load started later already published; this result was dropped.
    Stale {
        ticket: u64,
        current: Arc<LoadedDataset>,
    },
}

impl Published {
    /// The dataset that is current after publishing, whichever load produced it.
    pub fn latest(&self) -> &Arc<LoadedDataset> {
        match self {
            Published::Current(loaded) => loaded,
            Published::Stale { current, .. } => current,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Published::Stale { .. })
    }
}

/// Shared slot holding the most recently *started* load that has finished.
///
/// Each load takes a ticket with [`begin`](Self::begin) before doing any work.
/// A finished load only replaces the slot if no load with a newer ticket has
/// published yet, so a slow response can never overwrite a faster, newer one.
#[derive(Debug, Default)]
pub struct LatestDataset {
    next_ticket: AtomicU64,
    slot: Mutex<Option<Arc<LoadedDataset>>>,
}

impl LatestDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a ticket for a new load. Tickets increase strictly.
    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes `loaded` unless a newer ticket has already published.
    pub async fn publish(&self, loaded: LoadedDataset) -> Published {
        self.publish_with(loaded, |_| {}).await
    }

    /// Like [`publish`](Self::publish), running `on_current` while the slot is
    /// still locked if `loaded` becomes current. Side effects that must follow
    /// publication order (such as writing the cache) go here; a stale load
    /// never runs them.
    pub async fn publish_with<F>(&self, loaded: LoadedDataset, on_current: F) -> Published
    where
        F: FnOnce(&LoadedDataset),
    {
        let ticket = loaded.generation;
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(current) if current.generation > ticket => {
                debug!(
                    "Dropping result of load #{} (load #{} already published)",
                    ticket, current.generation
                );
                Published::Stale {
                    ticket,
                    current: Arc::clone(current),
                }
            }
            _ => {
                on_current(&loaded);
                let loaded = Arc::new(loaded);
                *slot = Some(Arc::clone(&loaded));
                Published::Current(loaded)
            }
        }
    }

    pub async fn get(&self) -> Option<Arc<LoadedDataset>> {
        self.slot.lock().await.clone()
    }
}

/// Loads the weather-station dataset and keeps the latest result.
///
/// Create one with [`DataService::builder()`] for an arbitrary
/// [`KeyValueStore`], or with [`DataService::with_default_cache()`] /
/// [`DataService::with_cache_folder()`] for a file-backed cache.
///
/// # Examples
///
/// ```rust
/// # use weather_dashboard::{DataService, MemoryStore, DataOrigin, DashboardError};
/// # async fn run() -> Result<(), DashboardError> {
/// let service = DataService::builder()
///     .store(MemoryStore::new())
///     .source_url("https://example.com/station.csv")
///     .build();
///
/// let published = service.load(false).await?;
/// let loaded = published.latest();
/// println!(
///     "{} rows from {:?}, time column {:?}",
///     loaded.dataset.len(),
///     loaded.origin,
///     loaded.classification.time_column()
/// );
/// # Ok(())
/// # }
/// ```
pub struct DataService<S: KeyValueStore> {
    fetcher: CsvFetcher,
    cache: DatasetCache<S>,
    source_url: String,
    vocabulary: FieldVocabulary,
    latest: LatestDataset,
}

#[bon]
impl<S: KeyValueStore> DataService<S> {
    /// Creates a service around `store`.
    ///
    /// # Arguments
    ///
    /// * `.store(S)`: **Required.** Backing store for the dataset cache.
    /// * `.source_url(impl Into<String>)`: Optional. CSV location. Defaults to [`DEFAULT_SOURCE_URL`].
    /// * `.freshness_window(Duration)`: Optional. How long a cached dataset is reused. Defaults to one hour.
    /// * `.vocabulary(FieldVocabulary)`: Optional. Field names that drive column inference.
    /// * `.client(reqwest::Client)`: Optional. HTTP client to download with.
    #[builder]
    pub fn new(
        store: S,
        #[builder(into)] source_url: Option<String>,
        freshness_window: Option<Duration>,
        vocabulary: Option<FieldVocabulary>,
        client: Option<reqwest::Client>,
    ) -> Self {
        let vocabulary = vocabulary.unwrap_or_default();
        let cache = DatasetCache::new(store)
            .with_freshness_window(freshness_window.unwrap_or(DEFAULT_FRESHNESS_WINDOW))
            .with_vocabulary(vocabulary.clone());
        Self {
            fetcher: CsvFetcher::with_client(client.unwrap_or_default()),
            cache,
            source_url: source_url.unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            vocabulary,
            latest: LatestDataset::new(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn cache(&self) -> &DatasetCache<S> {
        &self.cache
    }

    /// Loads the dataset and publishes it as the latest one.
    ///
    /// Unless `force_refresh` is set, a fresh cache entry is used without any
    /// network access. Otherwise the cache is invalidated (for a forced
    /// refresh), the CSV is downloaded and parsed, column kinds are inferred,
    /// values are coerced, and the result is written back to the cache.
    ///
    /// Cache failures are logged and never fail the load. Only a load that
    /// becomes current writes the cache.
    ///
    /// # Returns
    ///
    /// [`Published::Current`] when this load is the newest one to finish, or
    /// [`Published::Stale`] when a load started after it finished first.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Fetch`] if the download fails and
    /// [`DashboardError::Parse`] if the CSV holds no data or is malformed.
    /// Nothing is published in that case; [`load_sample`](Self::load_sample)
    /// is the caller's escape hatch.
    pub async fn load(&self, force_refresh: bool) -> Result<Published, DashboardError> {
        let ticket = self.latest.begin();

        if force_refresh {
            if let Err(e) = self.cache.invalidate() {
                warn!("Failed to invalidate cache before refresh: {}", e);
            }
        } else if self.cache.is_fresh() {
            if let Some(dataset) = self.cache.load() {
                info!("Using cached dataset ({} rows)", dataset.len());
                let classification = classify(&dataset, &self.vocabulary);
                return Ok(self
                    .publish(ticket, dataset, classification, DataOrigin::Cache)
                    .await);
            }
        }

        let text = self.fetcher.fetch_text(&self.source_url).await?;
        let mut dataset = tokio::task::spawn_blocking(move || parse_csv(&text))
            .await
            .map_err(ParseError::TaskJoin)??;

        let classification = classify(&dataset, &self.vocabulary);
        coerce_in_place(&mut dataset, &classification);
        info!(
            "Loaded {} rows: {} numeric, {} temporal, {} text columns",
            dataset.len(),
            classification.numeric_columns().len(),
            classification.temporal_columns().len(),
            classification.text_columns().len()
        );

        let published = self
            .latest
            .publish_with(
                LoadedDataset {
                    dataset,
                    classification,
                    origin: DataOrigin::Network,
                    generation: ticket,
                },
                |loaded| {
                    if let Err(e) = self.cache.save(&loaded.dataset) {
                        warn!("Failed to cache dataset, continuing without cache: {}", e);
                    }
                },
            )
            .await;
        if published.is_stale() {
            info!("Load #{} finished after a newer load, not caching it", ticket);
        }
        Ok(published)
    }

    /// Publishes synthetic sample data. Never touches the network or the cache.
    pub async fn load_sample(&self) -> Published {
        let ticket = self.latest.begin();
        let dataset = generate_sample_dataset(Utc::now(), DEFAULT_SAMPLE_ROWS);
        let classification = classify(&dataset, &self.vocabulary);
        self.publish(ticket, dataset, classification, DataOrigin::Sample)
            .await
    }

    /// Publishes a dataset read from offline artifacts in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Export`] if the artifacts cannot be read.
    pub async fn load_offline(&self, dir: &Path) -> Result<Published, DashboardError> {
        let ticket = self.latest.begin();
        let (dataset, classification) = read_offline_artifacts(dir, &self.vocabulary).await?;
        Ok(self
            .publish(ticket, dataset, classification, DataOrigin::Offline)
            .await)
    }

    /// The latest published dataset, if any load has finished.
    pub async fn latest(&self) -> Option<Arc<LoadedDataset>> {
        self.latest.get().await
    }

    async fn publish(
        &self,
        ticket: u64,
        dataset: Dataset,
        classification: ColumnClassification,
        origin: DataOrigin,
    ) -> Published {
        self.latest
            .publish(LoadedDataset {
                dataset,
                classification,
                origin,
                generation: ticket,
            })
            .await
    }
}

impl DataService<FileStore> {
    /// Creates a service caching into `cache_folder`, which is created if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::CacheDirCreation`] if the folder cannot be created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use weather_dashboard::{DataService, DashboardError};
    /// # use std::path::Path;
    /// # async fn run() -> Result<(), DashboardError> {
    /// let service = DataService::with_cache_folder(Path::new("/tmp/weather").to_path_buf()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, DashboardError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| DashboardError::CacheDirCreation(cache_folder.clone(), e))?;
        let store = FileStore::new(cache_folder)?;
        Ok(Self::builder().store(store).build())
    }

    /// Creates a service caching into the platform cache directory
    /// (e.g. `~/.cache/weather_dashboard_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::CacheDirResolution`] if there is no such
    /// directory and [`DashboardError::CacheDirCreation`] if it cannot be created.
    pub async fn with_default_cache() -> Result<Self, DashboardError> {
        let cache_folder = get_cache_dir().map_err(DashboardError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }
}
