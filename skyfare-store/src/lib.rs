pub mod app_config;
pub mod flight_cache;
pub mod memory_store;
pub mod redis_repo;

pub use flight_cache::{fingerprint, FlightCache, DEFAULT_CACHE_TTL};
pub use memory_store::MemoryStore;
pub use redis_repo::RedisClient;
