//! Periodic HTTP endpoint health checks with per-domain availability reports.
//!
//! A background task probes every configured endpoint on a fixed interval and
//! accumulates UP/DOWN counts per domain, while the foreground loop summarises
//! those counts at its own fixed interval.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod probe;
pub mod report;
pub mod worker;

pub use aggregator::{AvailabilityView, DomainAggregator, DomainStats, domain_key};
pub use config::{EndpointSpec, load_endpoints, parse_endpoints};
pub use error::{ConfigError, Error};
pub use monitor::{Schedule, monitor_endpoints, run};
pub use probe::{HealthResult, Prober};
pub use report::{AvailabilityLine, LogSink, ReportSink};
