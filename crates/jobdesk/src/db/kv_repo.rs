//! Key-value repository over the `kv_store` table.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError};

/// Reads a single value.
pub fn get(db: &Database, key: &str) -> Result<Option<String>, DatabaseError> {
    db.with_conn(|conn| {
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    })
}

/// Upserts all entries in one transaction: either every key is written or none.
pub fn set_many(db: &Database, entries: &[(String, String)]) -> Result<(), DatabaseError> {
    let now = Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                   updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    })
}

/// Deletes the given keys in one transaction. Missing keys are ignored.
pub fn remove_many(db: &Database, keys: &[String]) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    })
}

/// Lists keys starting with `prefix`, in ascending byte order.
///
/// Uses `substr` rather than `LIKE` so `_` and `%` in the prefix match literally.
pub fn keys_with_prefix(db: &Database, prefix: &str) -> Result<Vec<String>, DatabaseError> {
    let prefix_len = prefix.chars().count() as i64;
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT key FROM kv_store WHERE substr(key, 1, ?2) = ?1 ORDER BY key ASC",
        )?;
        let keys = stmt
            .query_map(params![prefix, prefix_len], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_get_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert!(get(&db, "nope").unwrap().is_none());
    }

    #[test]
    fn test_set_many_overwrites() {
        let db = Database::open_in_memory().unwrap();
        set_many(&db, &[entry("a", "1"), entry("b", "2")]).unwrap();
        set_many(&db, &[entry("a", "3")]).unwrap();

        assert_eq!(get(&db, "a").unwrap().as_deref(), Some("3"));
        assert_eq!(get(&db, "b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_remove_many_ignores_missing() {
        let db = Database::open_in_memory().unwrap();
        set_many(&db, &[entry("a", "1")]).unwrap();
        remove_many(&db, &["a".to_string(), "ghost".to_string()]).unwrap();
        assert!(get(&db, "a").unwrap().is_none());
    }

    #[test]
    fn test_keys_with_prefix_is_literal_and_sorted() {
        let db = Database::open_in_memory().unwrap();
        set_many(
            &db,
            &[
                entry("ns_backup_0000000000002", "x"),
                entry("ns_backup_0000000000001", "x"),
                entry("nsXbackup_0000000000003", "x"),
                entry("ns_jobs", "[]"),
            ],
        )
        .unwrap();

        let keys = keys_with_prefix(&db, "ns_backup_").unwrap();
        assert_eq!(
            keys,
            vec![
                "ns_backup_0000000000001".to_string(),
                "ns_backup_0000000000002".to_string()
            ]
        );
    }
}
