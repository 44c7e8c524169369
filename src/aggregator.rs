//! Per-domain availability counters.
//!
//! The map is shared between exactly one writer ([`DomainAggregator`], owned
//! by the polling task) and any number of readers ([`AvailabilityView`]).
//! Each record takes the write lock once, so the pair of counters of a
//! domain is always observed consistently.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::probe::HealthResult;

type StatsMap = BTreeMap<String, DomainStats>;

/// Cumulative probe counters for one domain. `up <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub total: u64,
    pub up: u64,
}

impl DomainStats {
    fn record(&mut self, result: HealthResult) {
        self.total += 1;
        if result.is_up() {
            self.up += 1;
        }
    }

    /// `round(100 * up / total)`, rounding halves to even. `None` while
    /// nothing has been recorded.
    #[must_use]
    pub fn availability_percentage(&self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }
        let scaled = 100 * self.up;
        let quotient = scaled / self.total;
        let twice_remainder = 2 * (scaled % self.total);
        let round_up = twice_remainder > self.total
            || (twice_remainder == self.total && quotient % 2 == 1);
        Some(quotient + u64::from(round_up))
    }
}

/// Derives the aggregation key of a URL: the host without scheme, path or
/// port. Applying it to its own output is a no-op.
#[must_use]
pub fn domain_key(url: &str) -> &str {
    let without_scheme = url.rsplit("//").next().unwrap_or(url);
    let host_and_port = without_scheme.split('/').next().unwrap_or(without_scheme);
    host_and_port.split(':').next().unwrap_or(host_and_port)
}

/// Write side of the domain counters. Not `Clone`: whoever owns it is the
/// only writer.
#[derive(Debug, Default)]
pub struct DomainAggregator {
    stats: Arc<RwLock<StatsMap>>,
}

impl DomainAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a read-only handle onto the same counters.
    #[must_use]
    pub fn view(&self) -> AvailabilityView {
        AvailabilityView {
            stats: Arc::clone(&self.stats),
        }
    }

    /// Counts one probe of `domain`, creating its zeroed entry first if
    /// needed. Insertion and increment happen under the same lock.
    pub fn record(&self, domain: &str, result: HealthResult) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = stats.get_mut(domain) {
            entry.record(result);
        } else {
            stats
                .entry(domain.to_string())
                .or_default()
                .record(result);
        }
    }
}

/// Cloneable read handle onto the domain counters.
#[derive(Debug, Clone)]
pub struct AvailabilityView {
    stats: Arc<RwLock<StatsMap>>,
}

impl AvailabilityView {
    /// Copies the current counters, ordered by domain.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, DomainStats)> {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        stats
            .iter()
            .map(|(domain, stats)| (domain.clone(), *stats))
            .collect()
    }

    #[must_use]
    pub fn get(&self, domain: &str) -> Option<DomainStats> {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        stats.get(domain).copied()
    }
}
