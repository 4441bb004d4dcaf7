pub mod breaks;
pub mod checkin;
pub mod checkout;
pub mod config;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod offices;
pub mod status;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    let store = SqliteStore::open(&cfg.database)?;
    init_db(&store.pool().conn)?;
    Ok(store)
}
