//! Constants for the download module (timeouts, pool sizing).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (30 seconds), applied to listings and images alike.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent download workers.
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Default capacity of the bounded download queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Inclusive bounds for the worker count.
pub const MIN_WORKER_COUNT: usize = 1;
pub const MAX_WORKER_COUNT: usize = 100;

/// Inclusive bounds for the queue capacity.
pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 10_000;
