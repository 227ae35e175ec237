//! Service threads.
//!
//! | Thread | Count | Role |
//! |--------|-------|------|
//! | `dispatch-N` | `service.workers` | Run requests against the controller |
//! | `region-cloud` | 0 or 1 | Republish the cached region cloud |
//! | `selection-notifier` | 1 | Turn selection batches into notifications |
//!
//! Dispatch workers stop when the shared `running` flag drops. The publisher
//! and notifier stop when the shutdown channel disconnects.

mod notifier;
mod publisher;
mod workers;

pub use notifier::ChangeNotifier;
pub use publisher::{PeriodicPublisher, publish_region_cloud};
pub use workers::{DispatchPool, ServiceClient, ServiceRequest, ServiceResponse};
