//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use homewise_app::ports::UserRepository;
use homewise_domain::error::{ConflictError, HomewiseError};
use homewise_domain::id::UserId;
use homewise_domain::user::{Role, User};

use crate::error::{StorageError, parse_timestamp};

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let email: String = row.try_get("email")?;
        let role: String = row.try_get("role")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(User {
            id: UserId::from_uuid(id),
            email,
            role: Role::from_str_lossy(&role),
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO users (id, email, role, created_at) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY rowid";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User) -> Result<User, HomewiseError> {
        let result = sqlx::query(INSERT)
            .bind(user.id.as_uuid())
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(user.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from);

        match result {
            Ok(_) => Ok(user),
            Err(err) if err.is_unique_violation() => Err(ConflictError {
                entity: "User",
                field: "email",
                value: user.email,
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, HomewiseError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, HomewiseError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<User>, HomewiseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
