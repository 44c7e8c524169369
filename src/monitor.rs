use log::info;
use std::{path::Path, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::aggregator::DomainAggregator;
use crate::config::{EndpointSpec, load_endpoints};
use crate::error::Error;
use crate::probe::Prober;
use crate::report::{LogSink, ReportSink, report_availability};
use crate::worker::spawn_poller;

pub const POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const REPORT_INTERVAL: Duration = Duration::from_secs(15);
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Timings of the two schedulers and of each probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub poll_interval: Duration,
    pub report_interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            report_interval: REPORT_INTERVAL,
            probe_timeout: PROBE_TIMEOUT,
        }
    }
}

/// Loads the endpoint list at `config_path` and monitors it with the default
/// schedule, logging the summaries, until `token` is cancelled.
///
/// # Errors
///
/// Returns [`Error::Config`] if the configuration is rejected; no endpoint is
/// probed in that case.
pub async fn run(config_path: &Path, token: CancellationToken) -> Result<(), Error> {
    let endpoints = load_endpoints(config_path)?;
    monitor_endpoints(endpoints, Schedule::default(), &LogSink, token).await
}

/// Polls `endpoints` in a detached background task and reports their
/// per-domain availability to `sink` every `schedule.report_interval`.
///
/// Returns once `token` is cancelled. The polling task observes the same
/// token but is not waited for.
///
/// # Errors
///
/// Returns [`Error::HttpClient`] if the HTTP client cannot be built.
pub async fn monitor_endpoints(
    endpoints: Vec<EndpointSpec>,
    schedule: Schedule,
    sink: &dyn ReportSink,
    token: CancellationToken,
) -> Result<(), Error> {
    let prober = Prober::new(schedule.probe_timeout)?;
    let aggregator = DomainAggregator::new();
    let view = aggregator.view();

    info!(
        "configuration loaded, beginning endpoint monitoring of {} endpoints",
        endpoints.len()
    );
    info!("Report interval: {:?}", schedule.report_interval);
    info!("Probe timeout: {:?}", schedule.probe_timeout);

    spawn_poller(
        endpoints,
        prober,
        aggregator,
        schedule.poll_interval,
        token.clone(),
    );

    report_availability(view, schedule.report_interval, sink, token).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let schedule = Schedule::default();
        assert_eq!(schedule.poll_interval, Duration::from_secs(15));
        assert_eq!(schedule.report_interval, Duration::from_secs(15));
        assert_eq!(schedule.probe_timeout, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config_before_polling() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "- url: http://example.com\n").unwrap();

        let result = run(temp_file.path(), CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(Error::Config(crate::error::ConfigError::MissingName { index: 0 }))
        ));
    }
}
