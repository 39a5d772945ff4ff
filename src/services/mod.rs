// Service exports
pub mod cache;
pub mod matchmaking;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use matchmaking::{ActionOutcome, MatchmakingService, RankedMatches, ServiceError};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{LikeStore, NotificationStore, ProfileStore, StoreError};
