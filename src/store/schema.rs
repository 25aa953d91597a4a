//! Idempotent schema loader

use super::StoreError;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Run every `.sql` file in `schema_dir`, in file name order
///
/// All SQL files must use "IF NOT EXISTS" clauses, since this runs on every start.
pub fn run_schema_migrations(
    conn: &mut Connection,
    schema_dir: impl AsRef<Path>,
) -> Result<usize, StoreError> {
    let schema_path = schema_dir.as_ref();

    if !schema_path.is_dir() {
        return Err(StoreError::SchemaDirMissing(
            schema_path.display().to_string(),
        ));
    }

    // Sort alphabetically so 00_, 01_, 02_ run in order
    let mut sql_files: Vec<_> = fs::read_dir(schema_path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();
    sql_files.sort();

    log::info!("🔧 Running schema migrations from: {}", schema_path.display());

    let tx = conn.transaction()?;
    for path in &sql_files {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!("   ├─ Executing: {}", filename);
        let sql_content = fs::read_to_string(path)?;
        tx.execute_batch(&sql_content)?;
    }
    tx.commit()?;

    log::info!("   └─ ✅ {} migration file(s) applied", sql_files.len());
    Ok(sql_files.len())
}
