//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use homewise_app::ports::DeviceRepository;
use homewise_domain::device::{ConnectionType, Device, DeviceKind, PowerState};
use homewise_domain::error::HomewiseError;
use homewise_domain::id::{DeviceId, UserId};

use crate::error::{StorageError, decode_error, parse_timestamp};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let user_id: uuid::Uuid = row.try_get("user_id")?;
        let kind: String = row.try_get("kind")?;
        let status: String = row.try_get("status")?;
        let speed: Option<i64> = row.try_get("speed")?;
        let connection_type: String = row.try_get("connection_type")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let speed = speed.map(u8::try_from).transpose().map_err(decode_error)?;

        Ok(Self(Device {
            id: DeviceId::from_uuid(id),
            user_id: UserId::from_uuid(user_id),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            kind: DeviceKind::from(kind),
            status: PowerState::from_str_lossy(&status),
            room: row.try_get("room")?,
            temperature: row.try_get("temperature")?,
            speed,
            connection_type: ConnectionType::from_str_lossy(&connection_type),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (
        id, user_id, name, brand, kind, status, room,
        temperature, speed, connection_type, created_at, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY rowid";
const SELECT_BY_USER: &str = "SELECT * FROM devices WHERE user_id = ? ORDER BY rowid";
const UPDATE: &str = r"
    UPDATE devices
    SET name = ?, brand = ?, kind = ?, status = ?, room = ?,
        temperature = ?, speed = ?, connection_type = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";
const DELETE_BY_USER: &str = "DELETE FROM devices WHERE user_id = ?";

/// `SQLite`-backed device repository.
///
/// Devices are listed in insertion order.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn create(&self, device: Device) -> Result<Device, HomewiseError> {
        sqlx::query(INSERT)
            .bind(device.id.as_uuid())
            .bind(device.user_id.as_uuid())
            .bind(&device.name)
            .bind(&device.brand)
            .bind(device.kind.as_str())
            .bind(device.status.as_str())
            .bind(&device.room)
            .bind(device.temperature)
            .bind(device.speed.map(i64::from))
            .bind(device.connection_type.as_str())
            .bind(device.created_at.to_rfc3339())
            .bind(device.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, HomewiseError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Device>, HomewiseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Device>, HomewiseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, device: Device) -> Result<Device, HomewiseError> {
        sqlx::query(UPDATE)
            .bind(&device.name)
            .bind(&device.brand)
            .bind(device.kind.as_str())
            .bind(device.status.as_str())
            .bind(&device.room)
            .bind(device.temperature)
            .bind(device.speed.map(i64::from))
            .bind(device.connection_type.as_str())
            .bind(device.updated_at.to_rfc3339())
            .bind(device.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn delete(&self, id: DeviceId) -> Result<(), HomewiseError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, HomewiseError> {
        let result = sqlx::query(DELETE_BY_USER)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected())
    }
}
