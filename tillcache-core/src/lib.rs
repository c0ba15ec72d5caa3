//! # Tillcache Core
//!
//! An in-process, thread-safe string cache with optional per-entry deadlines.
//!
//! ## Features
//!
//! - One mutex guards the whole map, so every operation is atomic
//! - Entries may carry a deadline; `None` means the entry never expires
//! - Lazy expiration: expired entries are removed when an operation touches
//!   them, never by a background task
//! - Keys and values are owned `String`s; reads hand back copies
//!
//! ## Example
//!
//! ```rust
//! use tillcache_core::{Cache, CacheConfig};
//! use std::time::{Duration, Instant};
//!
//! let cache = Cache::with_config(CacheConfig::default().with_initial_capacity(64));
//!
//! // Never expires
//! cache.put("user:123", "John Doe");
//!
//! // Expires at a fixed instant, or after a duration
//! cache.put_till("session:abc", "token", Instant::now() + Duration::from_secs(60));
//! cache.put_for("otp:42", "918273", Duration::from_secs(30));
//!
//! if let Some(value) = cache.get("user:123") {
//!     println!("User: {}", value);
//! }
//!
//! // Lists live keys and drops any expired entries it finds
//! let keys = cache.keys();
//! assert_eq!(keys.len(), 3);
//! ```

mod cache;
mod config;
mod entry;

pub use cache::Cache;
pub use config::CacheConfig;
