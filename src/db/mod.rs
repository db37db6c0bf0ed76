pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{create_pool, run_migrations, PgPlaceStore, PgTrustEdgeStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle, CachedPlaceStore};
pub use store::{PlaceReviewStore, TrustEdgeStore};
