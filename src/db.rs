use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Db {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct UserRecord {
    pub storage_key: String,
    pub welcomed: bool,
    pub first_seen: i64,
    pub last_seen: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub timestamp: i64,
    pub conversation_id: String,
    pub direction: String,
    pub activity_type: String,
    pub text: String,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Box<dyn std::error::Error + Send + Sync>> {
        self.conn
            .lock()
            .map_err(|e| format!("database lock poisoned: {}", e).into())
    }

    fn init_schema(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_state (
                storage_key  TEXT PRIMARY KEY,
                welcomed     INTEGER NOT NULL DEFAULT 0,
                first_seen   INTEGER NOT NULL,
                last_seen    INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp        INTEGER NOT NULL,
                conversation_id  TEXT NOT NULL,
                direction        TEXT NOT NULL,
                activity_type    TEXT NOT NULL,
                text             TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_activities_conversation
                ON activities(conversation_id, timestamp);",
        )?;
        Ok(())
    }

    /// Welcomed flag for a user; `false` when the user has never been stored.
    pub fn is_welcomed(&self, storage_key: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .get_user(storage_key)?
            .map(|user| user.welcomed)
            .unwrap_or(false))
    }

    pub fn set_welcomed(
        &self,
        storage_key: &str,
        welcomed: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let now = Utc::now().timestamp();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO user_state (storage_key, welcomed, first_seen, last_seen)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(storage_key) DO UPDATE SET
                welcomed = excluded.welcomed,
                last_seen = excluded.last_seen",
            params![storage_key, welcomed, now],
        )?;
        Ok(())
    }

    pub fn get_user(
        &self,
        storage_key: &str,
    ) -> Result<Option<UserRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT storage_key, welcomed, first_seen, last_seen
                 FROM user_state WHERE storage_key = ?1",
                params![storage_key],
                |row| {
                    Ok(UserRecord {
                        storage_key: row.get(0)?,
                        welcomed: row.get(1)?,
                        first_seen: row.get(2)?,
                        last_seen: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn log_activity(
        &self,
        conversation_id: &str,
        direction: &str,
        activity_type: &str,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let now = Utc::now().timestamp();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO activities (timestamp, conversation_id, direction, activity_type, text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![now, conversation_id, direction, activity_type, text],
        )?;
        Ok(())
    }

    pub fn get_transcript(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ActivityRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, conversation_id, direction, activity_type, text
             FROM activities WHERE conversation_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![conversation_id], |row| {
            Ok(ActivityRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                conversation_id: row.get(2)?,
                direction: row.get(3)?,
                activity_type: row.get(4)?,
                text: row.get(5)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
