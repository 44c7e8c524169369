use log::{error, info};
use std::time::Duration;
use tokio::{select, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::aggregator::{DomainAggregator, domain_key};
use crate::config::EndpointSpec;
use crate::probe::Prober;

/// Continuously probes the configured endpoints and records the results.
///
/// # Behavior
///
/// - Probes every endpoint once per cycle, in configuration order, one at a time
/// - Records each result under the endpoint's domain
/// - Sleeps for `interval` after a full pass before starting the next one
/// - Returns once `token` is cancelled
pub async fn poll_endpoints(
    endpoints: Vec<EndpointSpec>,
    prober: Prober,
    aggregator: DomainAggregator,
    interval: Duration,
    token: CancellationToken,
) {
    info!("Polling {} endpoints every {interval:?}", endpoints.len());

    loop {
        // Check if we should shutdown before starting new cycle
        if token.is_cancelled() {
            info!("Shutdown requested, stopping polling");
            break;
        }

        run_probe_cycle(&endpoints, &prober, &aggregator).await;

        // Interruptible sleep
        select! {
            () = sleep(interval) => {},
            () = token.cancelled() => {
                info!("Shutdown requested during sleep");
                break;
            }
        }
    }

    info!("Endpoint polling stopped");
}

/// Probes each endpoint once and records the outcome under its domain.
pub async fn run_probe_cycle(
    endpoints: &[EndpointSpec],
    prober: &Prober,
    aggregator: &DomainAggregator,
) {
    for endpoint in endpoints {
        let domain = domain_key(&endpoint.url);
        let result = prober.check(endpoint).await;
        aggregator.record(domain, result);
    }
}

/// Spawns [`poll_endpoints`] as a detached task.
///
/// A second task watches it and logs a panic instead of letting it go
/// unnoticed. The returned handle resolves once polling has ended; callers
/// are free to drop it.
pub fn spawn_poller(
    endpoints: Vec<EndpointSpec>,
    prober: Prober,
    aggregator: DomainAggregator,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    let poller = tokio::spawn(poll_endpoints(
        endpoints, prober, aggregator, interval, token,
    ));
    supervise(poller)
}

fn supervise(task: JoinHandle<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_panic() => error!("Polling task panicked: {e}"),
            Err(e) => error!("Polling task terminated abnormally: {e}"),
        }
    })
}
