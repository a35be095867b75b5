//! [`ScheduleCache`](flightcheck_core::ScheduleCache) implementations.
//!
//! - [`MemoryScheduleCache`]: a map that checks expiry against an injected
//!   [`Clock`](flightcheck_core::Clock), so tests control time.
//! - [`MokaScheduleCache`]: a bounded moka cache with a time-to-live, for
//!   long-running gateways.

pub mod memory;
pub mod moka;

pub use memory::{MemoryScheduleCache, DEFAULT_SCHEDULE_TTL};
pub use self::moka::{MokaCacheConfig, MokaScheduleCache};
