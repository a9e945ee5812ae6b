use duckdb::{params, Connection, Result as DbResult};

/// Key-value operations over the `kv_store` table.
pub struct DbService;

impl DbService {
    pub fn get_value(conn: &Connection, key: &str) -> DbResult<Option<String>> {
        let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn put_value(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Returns whether a row was actually removed.
    pub fn delete_value(conn: &Connection, key: &str) -> DbResult<bool> {
        let removed = conn.execute("DELETE FROM kv_store WHERE key = ?", params![key])?;
        Ok(removed > 0)
    }
}
