//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! once-per-minute rate-limit sweep that keeps the identifier map bounded.

use geovis_ratelimit::RateLimiter;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the sweep job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(limiter: RateLimiter) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let limiter = limiter.clone();
        Box::pin(async move {
            limiter.sweep();
        })
    })?;
    scheduler.add(job).await?;

    scheduler.start().await?;
    Ok(scheduler)
}
