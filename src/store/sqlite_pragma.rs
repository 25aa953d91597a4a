//! Connection-level PRAGMAs shared by every catalog connection

use rusqlite::Connection;
use std::time::Duration;

/// WAL, NORMAL sync, in-memory temp store, FK enforcement, 5s busy timeout
pub fn apply_optimized_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_secs(5))?;

    log::debug!("SQLite PRAGMAs applied (journal_mode={})", mode);
    Ok(())
}
