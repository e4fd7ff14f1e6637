//! Schema steps for the key-value database.
//!
//! # Invariants
//! - Step versions are strictly increasing; the newest one is `latest_version()`.
//! - The applied version lives in `PRAGMA user_version`.
//! - Pending steps run inside one transaction.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    label: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "kv_entries",
    sql: include_str!("0001_init.sql"),
}];

/// Newest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the key-value schema up to `latest_version()`.
///
/// Returns the versions applied by this call, oldest first; empty when the
/// schema was already current.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if found > latest {
        warn!(
            "event=db_migrate module=db status=error error_code=schema_too_new found={found} latest={latest}"
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.label
        );
    }
    tx.commit()?;

    Ok(pending.iter().map(|step| step.version).collect())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version};
    use rusqlite::Connection;

    #[test]
    fn fresh_database_applies_every_step_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        let applied = apply_migrations(&mut conn).unwrap();
        assert_eq!(applied.last().copied(), Some(latest_version()));

        assert!(apply_migrations(&mut conn).unwrap().is_empty());
    }
}
