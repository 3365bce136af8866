//! Entry points used by the surrounding service
//!
//! `ReportService` turns caller-supplied values into a validated
//! [`ReportRequest`] and hands it to the assembler. Batch generation runs one
//! blocking task per request; a single document is never shared between
//! tasks.

use crate::config::Settings;
use crate::domain::device::{Branch, Device};
use crate::domain::period::ReportPeriod;
use crate::domain::reading::{Reading, ReadingSeries, ReadingType};
use crate::domain::request::{RenderedReport, ReportBundle, ReportRequest, SignatureImage};
use crate::error::{ReportError, Result};
use crate::report::{ReportAssembler, ReportOptions};
use chrono::{DateTime, NaiveDate, Utc};
use nutype::nutype;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Upper bound on reports rendered at the same time in one batch
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 256),
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)
)]
pub struct MaxConcurrentReports(usize);

impl Default for MaxConcurrentReports {
    fn default() -> Self {
        Self::try_new(4).expect("4 is a valid concurrency bound")
    }
}

#[derive(Debug, Clone)]
pub struct ReportService {
    assembler: Arc<ReportAssembler>,
    max_concurrent: MaxConcurrentReports,
}

impl ReportService {
    pub fn new(settings: &Settings) -> Result<Self> {
        let options = ReportOptions::from_settings(&settings.report)?;
        let max_concurrent = MaxConcurrentReports::try_new(settings.batch.max_concurrent_reports)
            .map_err(|e| ReportError::invalid_input("batch.max_concurrent_reports", e))?;
        Self::with_options(options, max_concurrent)
    }

    pub fn with_options(
        options: ReportOptions,
        max_concurrent: MaxConcurrentReports,
    ) -> Result<Self> {
        Ok(Self {
            assembler: Arc::new(ReportAssembler::new(options)?),
            max_concurrent,
        })
    }

    pub fn options(&self) -> &ReportOptions {
        self.assembler.options()
    }

    /// Validate the period, decode the signature and order the readings
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_request(
        &self,
        branch: Branch,
        start: NaiveDate,
        end: NaiveDate,
        device: Device,
        reading_type: ReadingType,
        readings: Vec<Reading>,
        encoded_signature: &str,
    ) -> Result<ReportRequest> {
        let period = ReportPeriod::new(start, end, self.options().max_period_days)?;
        let signature = SignatureImage::from_data_url(encoded_signature)?;

        Ok(ReportRequest {
            branch,
            period,
            reading_type,
            device,
            signature,
            readings: ReadingSeries::new(readings),
        })
    }

    /// UTC bounds of the readings a caller should load for `period`
    pub fn reading_window(&self, period: &ReportPeriod) -> (DateTime<Utc>, DateTime<Utc>) {
        let options = self.options();
        period.reading_window(options.time_zone, options.sampling_interval)
    }

    /// Generate one report from raw caller input
    #[allow(clippy::too_many_arguments)]
    #[instrument(
        skip(self, device, readings, encoded_signature),
        fields(device = %device.tag, readings = readings.len())
    )]
    pub fn generate_report(
        &self,
        branch: Branch,
        start: NaiveDate,
        end: NaiveDate,
        device: Device,
        reading_type: ReadingType,
        readings: Vec<Reading>,
        encoded_signature: &str,
    ) -> Result<RenderedReport> {
        let request = self.prepare_request(
            branch,
            start,
            end,
            device,
            reading_type,
            readings,
            encoded_signature,
        )?;
        self.generate(&request)
    }

    /// Generate one report stamped with the current time
    pub fn generate(&self, request: &ReportRequest) -> Result<RenderedReport> {
        self.generate_at(request, Utc::now())
    }

    #[instrument(
        skip(self, request),
        fields(
            device = %request.device.tag,
            reading_type = %request.reading_type,
            start = %request.period.start(),
            end = %request.period.end()
        )
    )]
    pub fn generate_at(
        &self,
        request: &ReportRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<RenderedReport> {
        self.assembler.generate(request, generated_at)
    }

    /// Generate many reports concurrently
    ///
    /// Requests without readings produce no document. The bundle keeps the
    /// order of the remaining requests; the first failure fails the batch.
    #[instrument(skip(self, requests), fields(batch_id, requests = requests.len()))]
    pub async fn generate_all(&self, requests: Vec<ReportRequest>) -> Result<ReportBundle> {
        let batch_id = Uuid::now_v7();
        tracing::Span::current().record("batch_id", tracing::field::display(batch_id));

        let generated_at = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent.into_inner()));
        let mut tasks = JoinSet::new();

        for (index, request) in requests.into_iter().enumerate() {
            if request.readings.is_empty() {
                debug!(
                    device = %request.device.tag,
                    reading_type = %request.reading_type,
                    "Skipping request without readings"
                );
                continue;
            }

            let assembler = Arc::clone(&self.assembler);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ReportError::Task(e.to_string()))?;
                let report = tokio::task::spawn_blocking(move || {
                    assembler.generate(&request, generated_at)
                })
                .await
                .map_err(|e| ReportError::Task(e.to_string()))??;
                Ok::<_, ReportError>((index, report))
            });
        }

        let mut produced = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the set, which aborts the pending tasks
            let (index, report) = joined.map_err(|e| ReportError::Task(e.to_string()))??;
            produced.push((index, report));
        }
        produced.sort_by_key(|(index, _)| *index);

        info!(reports = produced.len(), "Batch generated");
        Ok(ReportBundle {
            reports: produced.into_iter().map(|(_, report)| report).collect(),
        })
    }
}
