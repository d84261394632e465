//! This module provides the main entry point for retrieving ERA5 reanalysis
//! data for the configured monitoring sites, one month of one site at a time
//! or fanned out across a whole year.

use crate::archive::cds_client::CdsClient;
use crate::archive::ArchiveClient;
use crate::config::RetrievalConfig;
use crate::error::Era5Error;
use crate::request::Era5Request;
use crate::sites::SiteRegistry;
use crate::types::level::RetrievalLevel;
use crate::types::outcome::{BatchSummary, FetchOutcome};
use crate::types::task::RetrievalTask;
use crate::utils::ensure_dir_exists;
use bon::bon;
use futures_util::{stream, StreamExt};
use log::{error, info};

/// The main client for retrieving ERA5 data.
///
/// Holds the configuration, the site registry and the archive client, and
/// exposes the retrieval operations as builder methods. Create one with
/// [`Era5::new`] for the real archive, or [`Era5::with_client`] to supply a
/// custom registry and transport.
///
/// Completed output files are never re-fetched: a task whose output path
/// already exists short-circuits to [`FetchOutcome::Skipped`] without any
/// archive call, so re-running a batch after a partial failure is cheap.
/// The existence check is not atomic with the download, so two concurrent
/// runs of the *same* task can both download; the last rename wins and both
/// produce the same bytes. This is a known limitation, not handled here.
///
/// # Examples
///
/// ```rust
/// # use era5_retrieval::{Era5, Era5Error, RetrievalConfig, RetrievalLevel};
/// # async fn run(config: RetrievalConfig) -> Result<(), Era5Error> {
/// let era5 = Era5::new(config).await?;
/// let outcomes = era5
///     .fetch_year()
///     .site("MHD")
///     .level(RetrievalLevel::Pressure)
///     .year(2020)
///     .call()
///     .await?;
/// assert_eq!(outcomes.len(), 12);
/// # Ok(())
/// # }
/// ```
pub struct Era5<C = CdsClient> {
    config: RetrievalConfig,
    registry: SiteRegistry,
    client: C,
}

impl Era5<CdsClient> {
    /// Creates a client for the real CDS archive with the built-in site
    /// registry, ensuring the configured data directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`Era5Error::DataDirCreation`] if the data directory cannot
    /// be created.
    pub async fn new(config: RetrievalConfig) -> Result<Self, Era5Error> {
        let client = CdsClient::new(&config.archive_url, &config.archive_key);
        Self::with_client(config, SiteRegistry::builtin(), client).await
    }
}

impl<C: ArchiveClient> Era5<C> {
    /// Creates a client with an explicit registry and archive client.
    /// The seam tests and alternative transports plug into.
    pub async fn with_client(
        config: RetrievalConfig,
        registry: SiteRegistry,
        client: C,
    ) -> Result<Self, Era5Error> {
        ensure_dir_exists(&config.data_dir)
            .await
            .map_err(|e| Era5Error::DataDirCreation(config.data_dir.clone(), e))?;
        Ok(Self {
            config,
            registry,
            client,
        })
    }

    /// Runs one already-validated task to its terminal outcome. Archive
    /// failures are logged and converted, never propagated.
    async fn run_task(&self, task: &RetrievalTask, half_width: f64) -> FetchOutcome {
        let target = task.output_path(&self.config.data_dir);
        if tokio::fs::metadata(&target).await.is_ok() {
            info!("{task} already downloaded, skipping");
            return FetchOutcome::Skipped;
        }

        info!("downloading {task}");
        let area = task.site.domain(half_width);
        let request = Era5Request::new(task.level, task.year, task.month, area);
        match self
            .client
            .retrieve(task.level.dataset(), &request, &target)
            .await
        {
            Ok(()) => {
                info!("{task} downloaded to {}", target.display());
                FetchOutcome::Downloaded
            }
            Err(e) => {
                error!("download failed for {task}: {e}");
                FetchOutcome::Failed(e)
            }
        }
    }
}

#[bon]
impl<C: ArchiveClient> Era5<C> {
    /// Retrieves a single (site, level, year, month) unit.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.site(&str)`: **Required.** Site code, e.g. `"MHD"`.
    /// * `.level(RetrievalLevel)`: **Required.** Pressure or single level.
    /// * `.year(i32)`: **Required.** Four-digit target year.
    /// * `.month(u32)`: **Required.** Target month, 1-12.
    /// * `.half_width(f64)`: Optional. Domain half-width in degrees;
    ///   defaults to the configured value.
    ///
    /// # Returns
    ///
    /// The terminal [`FetchOutcome`] of the unit. A failed archive call is
    /// the `Failed` outcome, not an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`Era5Error::UnknownSite`] or [`Era5Error::MonthOutOfRange`]
    /// for construction mistakes, and [`Era5Error::OutputDirCreation`] if
    /// the output directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use era5_retrieval::{Era5, Era5Error, FetchOutcome, RetrievalLevel};
    /// # async fn run(era5: Era5) -> Result<(), Era5Error> {
    /// let outcome = era5
    ///     .fetch_month()
    ///     .site("MHD")
    ///     .level(RetrievalLevel::Pressure)
    ///     .year(2020)
    ///     .month(6)
    ///     .call()
    ///     .await?;
    /// assert!(!outcome.is_failed());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_month(
        &self,
        site: &str,
        level: RetrievalLevel,
        year: i32,
        month: u32,
        half_width: Option<f64>,
    ) -> Result<FetchOutcome, Era5Error> {
        if !(1..=12).contains(&month) {
            return Err(Era5Error::MonthOutOfRange(month));
        }
        let site = self
            .registry
            .get(site)
            .cloned()
            .ok_or_else(|| Era5Error::UnknownSite(site.to_string()))?;
        let task = RetrievalTask::new(site, level, year, month);

        let dir = task.output_dir(&self.config.data_dir);
        ensure_dir_exists(&dir)
            .await
            .map_err(|e| Era5Error::OutputDirCreation(dir, e))?;

        let half_width = half_width.unwrap_or(self.config.half_width_degrees);
        Ok(self.run_task(&task, half_width).await)
    }

    /// Retrieves all 12 months of one (site, level, year), at most
    /// `concurrency` requests in flight at a time.
    ///
    /// The limit is an archive protocol constraint (silent throttling sets
    /// in beyond 2-3 concurrent requests) and is enforced strictly. One
    /// task's failure never aborts the others; the returned outcomes are
    /// collected in completion order.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.site(&str)`: **Required.** Site code, e.g. `"MHD"`.
    /// * `.level(RetrievalLevel)`: **Required.** Pressure or single level.
    /// * `.year(i32)`: **Required.** Four-digit target year.
    /// * `.concurrency(usize)`: Optional. In-flight cap; defaults to the
    ///   configured value, floored at 1.
    /// * `.half_width(f64)`: Optional. Domain half-width in degrees.
    ///
    /// # Returns
    ///
    /// The 12 terminal [`FetchOutcome`]s.
    ///
    /// # Errors
    ///
    /// Returns [`Era5Error::UnknownSite`] before any task is spawned, and
    /// [`Era5Error::OutputDirCreation`] if the output directory cannot be
    /// created.
    #[builder]
    pub async fn fetch_year(
        &self,
        site: &str,
        level: RetrievalLevel,
        year: i32,
        concurrency: Option<usize>,
        half_width: Option<f64>,
    ) -> Result<Vec<FetchOutcome>, Era5Error> {
        let site = self
            .registry
            .get(site)
            .cloned()
            .ok_or_else(|| Era5Error::UnknownSite(site.to_string()))?;
        let tasks: Vec<RetrievalTask> = (1..=12)
            .map(|month| RetrievalTask::new(site.clone(), level, year, month))
            .collect();

        // One directory serves all 12 months; create it before fanning out.
        let dir = tasks[0].output_dir(&self.config.data_dir);
        ensure_dir_exists(&dir)
            .await
            .map_err(|e| Era5Error::OutputDirCreation(dir, e))?;

        let half_width = half_width.unwrap_or(self.config.half_width_degrees);
        let limit = concurrency.unwrap_or(self.config.concurrent_requests).max(1);

        let outcomes = stream::iter(tasks.iter())
            .map(|task| self.run_task(task, half_width))
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;
        Ok(outcomes)
    }

    /// Runs the full batch: every registry site, every configured year,
    /// every configured level.
    ///
    /// Year batches run sequentially so the configured concurrency limit
    /// bounds the whole process, trading cross-site parallelism for staying
    /// inside the archive's request limit. A year batch that cannot start
    /// (construction mistake) is logged and counted; the batch moves on.
    pub async fn fetch_all(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for site in self.registry.iter() {
            for year in self.config.first_year..=self.config.last_year {
                for &level in &self.config.levels {
                    let result = self
                        .fetch_year()
                        .site(&site.code)
                        .level(level)
                        .year(year)
                        .call()
                        .await;
                    match result {
                        Ok(outcomes) => {
                            for outcome in &outcomes {
                                summary.record(outcome);
                            }
                        }
                        Err(e) => {
                            error!("year batch {} {level} {year} failed to start: {e}", site.code);
                            summary.aborted += 1;
                        }
                    }
                }
            }
        }
        info!("batch complete: {summary}");
        summary
    }
}
