// storage/mod.rs
// SQLite persistence: pool setup, migrations, and the read-through cache

pub mod cache;
pub mod migrations;
pub mod pool;

pub use cache::{check_domain, clear_cache, get_cached_check, upsert_check};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
