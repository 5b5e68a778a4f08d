//! User service: registration and lookup of homeowners and admins.

use homewise_domain::error::{ConflictError, HomewiseError, NotFoundError};
use homewise_domain::id::UserId;
use homewise_domain::user::{Role, User};

use crate::ports::UserRepository;

/// Application service for user accounts.
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new user.
    ///
    /// The email is normalised (trimmed, lower-cased) before the uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] for a malformed email,
    /// [`HomewiseError::Conflict`] when the email is already registered,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn register_user(&self, email: &str, role: Role) -> Result<User, HomewiseError> {
        let user = User::builder().email(email).role(role).build()?;
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(ConflictError {
                entity: "User",
                field: "email",
                value: user.email,
            }
            .into());
        }
        let user = self.repo.create(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_user(&self, id: UserId) -> Result<User, HomewiseError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, HomewiseError> {
        self.repo.get_all().await
    }
}
