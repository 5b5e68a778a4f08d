//! `SQLite` implementation of [`ActivityLogRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use homewise_app::ports::ActivityLogRepository;
use homewise_domain::activity_log::ActivityLog;
use homewise_domain::error::HomewiseError;
use homewise_domain::id::{ActivityLogId, DeviceId, UserId};

use crate::error::{StorageError, parse_timestamp};

struct Wrapper(ActivityLog);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let user_id: uuid::Uuid = row.try_get("user_id")?;
        let device_id: Option<uuid::Uuid> = row.try_get("device_id")?;
        let timestamp: String = row.try_get("timestamp")?;

        Ok(Self(ActivityLog {
            id: ActivityLogId::from_uuid(id),
            user_id: UserId::from_uuid(user_id),
            device_id: device_id.map(DeviceId::from_uuid),
            action: row.try_get("action")?,
            timestamp: parse_timestamp(&timestamp)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO activity_logs (id, user_id, device_id, action, timestamp)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_RECENT: &str = "SELECT * FROM activity_logs ORDER BY rowid DESC LIMIT ?";
const SELECT_BY_USER: &str =
    "SELECT * FROM activity_logs WHERE user_id = ? ORDER BY rowid DESC LIMIT ?";

/// `SQLite`-backed activity log. Entries come back newest first.
pub struct SqliteActivityLogRepository {
    pool: SqlitePool,
}

impl SqliteActivityLogRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActivityLogRepository for SqliteActivityLogRepository {
    async fn append(&self, log: ActivityLog) -> Result<ActivityLog, HomewiseError> {
        sqlx::query(INSERT)
            .bind(log.id.as_uuid())
            .bind(log.user_id.as_uuid())
            .bind(log.device_id.map(DeviceId::as_uuid))
            .bind(&log.action)
            .bind(log.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(log)
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<ActivityLog>, HomewiseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityLog>, HomewiseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.as_uuid())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use homewise_domain::time::now;

    async fn setup() -> SqliteActivityLogRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteActivityLogRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_return_recent_logs_newest_first() {
        let repo = setup().await;
        let user_id = UserId::new();
        for action in ["first", "second", "third"] {
            repo.append(ActivityLog::new(user_id, None, action, now()))
                .await
                .unwrap();
        }

        let recent: Vec<String> = repo
            .get_recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.action)
            .collect();
        assert_eq!(recent, vec!["third", "second"]);
    }

    #[tokio::test]
    async fn should_filter_logs_by_user() {
        let repo = setup().await;
        let alice = UserId::new();
        let bob = UserId::new();
        let device_id = DeviceId::new();
        repo.append(ActivityLog::new(alice, Some(device_id), "Toggled device \"Lamp\"", now()))
            .await
            .unwrap();
        repo.append(ActivityLog::new(bob, None, "Removed all 0 devices", now()))
            .await
            .unwrap();

        let logs = repo.find_by_user(alice, 50).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].device_id, Some(device_id));
        assert_eq!(logs[0].action, "Toggled device \"Lamp\"");
    }
}
