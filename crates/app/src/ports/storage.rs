//! Storage port: repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::Device;
use homewise_domain::error::HomewiseError;
use homewise_domain::id::{DeviceId, UserId};
use homewise_domain::user::User;

/// Persistence for [`User`] accounts.
pub trait UserRepository {
    /// Insert a new user.
    fn create(&self, user: User) -> impl Future<Output = Result<User, HomewiseError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send;

    /// Look up a user by (already normalised) email address.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, HomewiseError>> + Send;
}

/// Persistence for [`Device`]s.
///
/// Listing methods return devices in insertion order; the recommendation
/// rules depend on that order being stable.
pub trait DeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send;

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, HomewiseError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send;

    /// All devices owned by `user_id`.
    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send;

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send;

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), HomewiseError>> + Send;

    /// Delete every device owned by `user_id`, returning how many were removed.
    fn delete_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, HomewiseError>> + Send;
}

/// Append-only persistence for [`ActivityLog`] entries.
pub trait ActivityLogRepository {
    fn append(
        &self,
        log: ActivityLog,
    ) -> impl Future<Output = Result<ActivityLog, HomewiseError>> + Send;

    /// Most recent entries across all users, newest first.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send;

    /// Most recent entries of one user, newest first.
    fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send;
}

impl<T: UserRepository + Send + Sync> UserRepository for Arc<T> {
    fn create(&self, user: User) -> impl Future<Output = Result<User, HomewiseError>> + Send {
        (**self).create(user)
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send {
        (**self).find_by_email(email)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, HomewiseError>> + Send {
        (**self).get_all()
    }
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send {
        (**self).create(device)
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, HomewiseError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        (**self).get_all()
    }

    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        (**self).find_by_user(user_id)
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send {
        (**self).update(device)
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), HomewiseError>> + Send {
        (**self).delete(id)
    }

    fn delete_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, HomewiseError>> + Send {
        (**self).delete_by_user(user_id)
    }
}

impl<T: ActivityLogRepository + Send + Sync> ActivityLogRepository for Arc<T> {
    fn append(
        &self,
        log: ActivityLog,
    ) -> impl Future<Output = Result<ActivityLog, HomewiseError>> + Send {
        (**self).append(log)
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send {
        (**self).get_recent(limit)
    }

    fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send {
        (**self).find_by_user(user_id, limit)
    }
}
