use log::info;
use std::{fmt, time::Duration};
use tokio::{select, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::aggregator::AvailabilityView;

/// One line of the periodic availability summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityLine {
    pub domain: String,
    pub percentage: u64,
}

impl fmt::Display for AvailabilityLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {}% availability percentage",
            self.domain, self.percentage
        )
    }
}

/// Destination for availability summaries.
pub trait ReportSink: Send + Sync {
    fn emit(&self, line: &AvailabilityLine);
}

/// Writes each summary line to the log at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&self, line: &AvailabilityLine) {
        info!("{line}");
    }
}

/// Computes the current availability of every domain with at least one probe.
#[must_use]
pub fn availability_lines(view: &AvailabilityView) -> Vec<AvailabilityLine> {
    view.snapshot()
        .into_iter()
        .filter_map(|(domain, stats)| {
            stats
                .availability_percentage()
                .map(|percentage| AvailabilityLine { domain, percentage })
        })
        .collect()
}

/// Emits one summary line per known domain.
pub fn report_once(view: &AvailabilityView, sink: &dyn ReportSink) {
    for line in availability_lines(view) {
        sink.emit(&line);
    }
}

/// Sleeps for `interval`, then reports, forever, until `token` is cancelled.
pub async fn report_availability(
    view: AvailabilityView,
    interval: Duration,
    sink: &dyn ReportSink,
    token: CancellationToken,
) {
    loop {
        select! {
            () = sleep(interval) => report_once(&view, sink),
            () = token.cancelled() => {
                info!("Shutdown requested, stopping reports");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DomainAggregator;
    use crate::probe::HealthResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingSink {
        lines: Mutex<Vec<String>>,
    }

    impl ReportSink for CollectingSink {
        fn emit(&self, line: &AvailabilityLine) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    #[test]
    fn test_line_format() {
        let line = AvailabilityLine {
            domain: "example.com".to_string(),
            percentage: 67,
        };
        assert_eq!(line.to_string(), "example.com has 67% availability percentage");
    }

    #[test]
    fn test_report_once_lists_known_domains() {
        let aggregator = DomainAggregator::new();
        aggregator.record("b.example.com", HealthResult::Up);
        aggregator.record("a.example.com", HealthResult::Up);
        aggregator.record("a.example.com", HealthResult::Down);
        aggregator.record("a.example.com", HealthResult::Down);

        let sink = CollectingSink::default();
        report_once(&aggregator.view(), &sink);

        assert_eq!(
            *sink.lines.lock().unwrap(),
            vec![
                "a.example.com has 33% availability percentage",
                "b.example.com has 100% availability percentage",
            ]
        );
    }

    #[test]
    fn test_nothing_reported_without_data() {
        let aggregator = DomainAggregator::new();
        let sink = CollectingSink::default();
        report_once(&aggregator.view(), &sink);
        assert!(sink.lines.lock().unwrap().is_empty());
        assert!(availability_lines(&aggregator.view()).is_empty());
    }

    #[tokio::test]
    async fn test_reports_each_interval_until_cancelled() {
        let aggregator = DomainAggregator::new();
        aggregator.record("example.com", HealthResult::Up);

        let sink = CollectingSink::default();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(250)).await;
            canceller.cancel();
        });

        report_availability(aggregator.view(), Duration::from_millis(20), &sink, token).await;

        let lines = sink.lines.lock().unwrap();
        assert!(lines.len() >= 2, "expected several reports, got {lines:?}");
        assert!(
            lines
                .iter()
                .all(|line| line == "example.com has 100% availability percentage")
        );
    }

    #[tokio::test]
    async fn test_first_report_waits_one_interval() {
        let aggregator = DomainAggregator::new();
        aggregator.record("example.com", HealthResult::Up);

        let sink = CollectingSink::default();
        let token = CancellationToken::new();
        token.cancel();

        report_availability(aggregator.view(), Duration::from_secs(15), &sink, token).await;
        assert!(sink.lines.lock().unwrap().is_empty());
    }
}
