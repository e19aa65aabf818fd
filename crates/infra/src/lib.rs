//! Infrastructure layer: caching, time and in-memory service implementations.

pub mod account;
pub mod cache;
pub mod clock;
pub mod geo;

pub use account::{AccountStatus, InMemoryAccountService};
pub use cache::{CacheEntryOptions, CacheStore, MokaCache, read_through};
pub use clock::{Clock, ManualClock, SystemClock};
pub use geo::InMemoryGeoService;
