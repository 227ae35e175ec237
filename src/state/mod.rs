//! Shared state between dispatch workers and background threads.
//!
//! - [`ResultCache`]: last successful detection result + region cloud
//! - [`CancelTicket`]: per-request abandonment flag used by timeouts

mod cache;
mod ticket;

pub use cache::{CacheSnapshot, DetectionResult, ResultCache};
pub use ticket::CancelTicket;
