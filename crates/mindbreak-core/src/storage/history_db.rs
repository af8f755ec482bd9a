//! SQLite-based storage for the usage log, custom activities, and schedules.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::{data_dir, migrations};
use crate::activity::Activity;
use crate::error::StoreError;
use crate::history::{UsageLog, UsageRecord, DEFAULT_LOG_CAP};
use crate::schedule::Schedule;

/// Durable store behind the in-memory engine state.
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (and migrate) the database at the default location.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Self::open_at(dir.join("mindbreak.db"))
    }

    /// Open (and migrate) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        migrations::migrate(&conn)
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrations::migrate(&conn)
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Usage log ===

    /// Append one usage record.
    pub fn append_usage(&self, record: &UsageRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO usage_log (activity_id, context_id, selected_at, completed, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.activity_id,
                record.context_id,
                record.selected_at.to_rfc3339(),
                record.completed as i32,
                record.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Mark the most recent open record for `(activity, context)` completed.
    ///
    /// Returns true if a record was updated.
    pub fn mark_completed(
        &self,
        activity_id: &str,
        context_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let updated = self.conn.execute(
            "UPDATE usage_log SET completed = 1, completed_at = ?1
             WHERE id = (
                 SELECT id FROM usage_log
                 WHERE activity_id = ?2 AND context_id = ?3 AND completed = 0
                 ORDER BY selected_at DESC, id DESC
                 LIMIT 1
             )",
            params![at.to_rfc3339(), activity_id, context_id],
        )?;
        Ok(updated > 0)
    }

    /// Load the most recent records into a bounded in-memory log.
    pub fn load_log(&self, cap: usize) -> Result<UsageLog, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT activity_id, context_id, selected_at, completed, completed_at
             FROM usage_log
             ORDER BY selected_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([cap as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (activity_id, context_id, selected_at, completed, completed_at) = row?;
            records.push(UsageRecord {
                activity_id,
                context_id,
                selected_at: parse_timestamp(&selected_at)?,
                completed: completed != 0,
                completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
            });
        }
        Ok(UsageLog::from_records(records, cap))
    }

    /// Load with the default cap.
    pub fn load_default_log(&self) -> Result<UsageLog, StoreError> {
        self.load_log(DEFAULT_LOG_CAP)
    }

    /// Delete records beyond the most recent `cap`.
    pub fn prune(&self, cap: usize) -> Result<usize, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM usage_log WHERE id NOT IN (
                 SELECT id FROM usage_log ORDER BY selected_at DESC, id DESC LIMIT ?1
             )",
            [cap as i64],
        )?;
        Ok(deleted)
    }

    // === Custom activities ===

    /// Insert or replace a custom activity.
    pub fn save_custom(&self, activity: &Activity) -> Result<(), StoreError> {
        let payload = serde_json::to_string(activity)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO custom_activities (id, payload) VALUES (?1, ?2)",
            params![activity.id, payload],
        )?;
        Ok(())
    }

    /// Delete a custom activity. Returns true if one existed.
    pub fn delete_custom(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM custom_activities WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Load all stored custom activities.
    pub fn load_customs(&self) -> Result<Vec<Activity>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload FROM custom_activities ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut activities = Vec::new();
        for row in rows {
            let (id, payload) = row?;
            let activity: Activity =
                serde_json::from_str(&payload).map_err(|e| StoreError::CorruptRecord {
                    kind: "activity",
                    id,
                    message: e.to_string(),
                })?;
            activities.push(activity);
        }
        Ok(activities)
    }

    // === Schedules ===

    /// Insert or replace a restriction schedule.
    pub fn save_schedule(&self, schedule: &Schedule) -> Result<(), StoreError> {
        let payload = serde_json::to_string(schedule)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO schedules (id, payload) VALUES (?1, ?2)",
            params![schedule.id, payload],
        )?;
        Ok(())
    }

    /// Delete a schedule. Returns true if one existed.
    pub fn delete_schedule(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM schedules WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Load one schedule by id.
    pub fn get_schedule(&self, id: &str) -> Result<Option<Schedule>, StoreError> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM schedules WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        payload
            .map(|p| {
                serde_json::from_str(&p).map_err(|e| StoreError::CorruptRecord {
                    kind: "schedule",
                    id: id.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Load all stored schedules.
    pub fn load_schedules(&self) -> Result<Vec<Schedule>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, payload FROM schedules ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut schedules = Vec::new();
        for row in rows {
            let (id, payload) = row?;
            let schedule: Schedule =
                serde_json::from_str(&payload).map_err(|e| StoreError::CorruptRecord {
                    kind: "schedule",
                    id,
                    message: e.to_string(),
                })?;
            schedules.push(schedule);
        }
        Ok(schedules)
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRecord {
            kind: "timestamp",
            id: s.to_string(),
            message: e.to_string(),
        })
}
