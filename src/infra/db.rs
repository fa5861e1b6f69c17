//! SQLite connection and schema setup.

use super::schema;
use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// The single storage handle, constructed once and passed to every operation.
pub struct DbPool(pub Mutex<Connection>);

/// Open (or create) the database at path and ensure the tables exist.
pub fn init_db(db_path: &Path) -> Result<DbPool, AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::Db(e.to_string()))?;
    }
    let conn = Connection::open(db_path).map_err(|e| AppError::Db(e.to_string()))?;
    prepare(conn)
}

/// Isolated in-memory database; each call gets its own empty store.
pub fn init_memory_db() -> Result<DbPool, AppError> {
    let conn = Connection::open_in_memory().map_err(|e| AppError::Db(e.to_string()))?;
    prepare(conn)
}

fn prepare(conn: Connection) -> Result<DbPool, AppError> {
    conn.execute_batch(schema::PRAGMAS)
        .map_err(|e| AppError::Db(format!("pragmas: {e}")))?;
    ensure_schema(&conn)?;
    Ok(DbPool(Mutex::new(conn)))
}

/// Create both tables and the participant index if missing.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(schema::CREATE_TABLES)
        .map_err(|e| AppError::Db(format!("schema: {e}")))
}

/// Get connection from pool (for use in operations).
pub(crate) fn get_connection(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.0
        .lock()
        .map_err(|_| AppError::Db("db lock poisoned".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn memory_db_has_both_tables() {
        let pool = init_memory_db().unwrap();
        let conn = get_connection(&pool).unwrap();
        let names = table_names(&conn);
        assert!(names.contains(&"activity".to_string()));
        assert!(names.contains(&"participant".to_string()));
    }

    #[test]
    fn ensure_schema_is_repeatable() {
        let pool = init_memory_db().unwrap();
        let conn = get_connection(&pool).unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn foreign_keys_enabled() {
        let pool = init_memory_db().unwrap();
        let conn = get_connection(&pool).unwrap();
        let on: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(on, 1);

        let err = conn.execute(
            "INSERT INTO participant (email, activity_name) VALUES ('a@x.com', 'ghost')",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn capacity_column_bounded_to_u32() {
        let pool = init_memory_db().unwrap();
        let conn = get_connection(&pool).unwrap();
        conn.execute(
            "INSERT INTO activity (name, max_participants) VALUES ('Max', 4294967295)",
            [],
        )
        .unwrap();
        for bad in ["-1", "4294967296"] {
            let sql = format!(
                "INSERT INTO activity (name, max_participants) VALUES ('Bad{bad}', {bad})"
            );
            assert!(conn.execute(&sql, []).is_err(), "accepted {bad}");
        }
        drop(conn);

        let all = crate::app::list_activities(&pool).unwrap();
        assert_eq!(all["Max"].max_participants, Some(u32::MAX));
    }

    #[test]
    fn poisoned_lock_is_db_error() {
        let pool = init_memory_db().unwrap();
        let joined = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = pool.0.lock().unwrap();
                panic!("writer died holding the lock");
            })
            .join()
        });
        assert!(joined.is_err());
        assert!(pool.0.is_poisoned());

        let err = crate::app::list_activities(&pool).unwrap_err();
        assert_eq!(err.code(), "DB_ERROR");
        let err = crate::app::add_participant(&pool, "Chess Club", "a@x.com").unwrap_err();
        assert_eq!(err.code(), "DB_ERROR");
    }

    #[test]
    fn file_db_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sqlite3");
        init_db(&path).unwrap();
        assert!(path.exists());
    }
}
