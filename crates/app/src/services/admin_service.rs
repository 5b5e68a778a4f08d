//! Admin service: fleet-wide statistics and activity feeds.

use homewise_domain::activity_log::ActivityLog;
use homewise_domain::error::HomewiseError;
use homewise_domain::id::UserId;
use homewise_domain::stats::FleetStats;

use crate::ports::{ActivityLogRepository, DeviceRepository, UserRepository};

/// Number of entries in the admin activity feed.
pub const RECENT_LOG_LIMIT: usize = 100;

/// Number of entries in a single user's activity feed.
pub const USER_LOG_LIMIT: usize = 50;

/// Read-only overview across all users.
pub struct AdminService<UR, DR, LR> {
    users: UR,
    devices: DR,
    logs: LR,
}

impl<UR, DR, LR> AdminService<UR, DR, LR>
where
    UR: UserRepository,
    DR: DeviceRepository,
    LR: ActivityLogRepository,
{
    pub fn new(users: UR, devices: DR, logs: LR) -> Self {
        Self {
            users,
            devices,
            logs,
        }
    }

    /// Count users, devices and active devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn stats(&self) -> Result<FleetStats, HomewiseError> {
        let users = self.users.get_all().await?;
        let devices = self.devices.get_all().await?;
        Ok(FleetStats::compute(users.len(), &devices))
    }

    /// The newest [`RECENT_LOG_LIMIT`] entries across all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn recent_logs(&self) -> Result<Vec<ActivityLog>, HomewiseError> {
        self.logs.get_recent(RECENT_LOG_LIMIT).await
    }

    /// The newest [`USER_LOG_LIMIT`] entries of one user.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn user_logs(&self, user_id: UserId) -> Result<Vec<ActivityLog>, HomewiseError> {
        self.logs.find_by_user(user_id, USER_LOG_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryDeviceRepo, InMemoryLogRepo, InMemoryUserRepo};
    use homewise_domain::device::{Device, PowerState};
    use homewise_domain::time::now;
    use homewise_domain::user::User;

    #[tokio::test]
    async fn should_compute_fleet_stats() {
        let users = InMemoryUserRepo::default();
        let owner = User::builder().email("a@example.com").build().unwrap();
        users.create(owner.clone()).await.unwrap();
        users
            .create(User::builder().email("b@example.com").build().unwrap())
            .await
            .unwrap();

        let devices = InMemoryDeviceRepo::default();
        for status in [PowerState::On, PowerState::Off, PowerState::On] {
            devices.insert(
                Device::builder()
                    .user_id(owner.id)
                    .name("Lamp")
                    .brand("Ikea")
                    .kind("Light")
                    .status(status)
                    .build()
                    .unwrap(),
            );
        }

        let svc = AdminService::new(users, devices, InMemoryLogRepo::default());
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.user_count, 2);
        assert_eq!(stats.device_count, 3);
        assert_eq!(stats.active_devices, 2);
        assert!((stats.average_devices_per_user - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_cap_activity_feeds_newest_first() {
        let logs = InMemoryLogRepo::default();
        let user_id = UserId::new();
        for i in 0..(RECENT_LOG_LIMIT + 5) {
            logs.append(ActivityLog::new(user_id, None, format!("action {i}"), now()))
                .await
                .unwrap();
        }
        let svc = AdminService::new(
            InMemoryUserRepo::default(),
            InMemoryDeviceRepo::default(),
            logs,
        );

        let recent = svc.recent_logs().await.unwrap();
        assert_eq!(recent.len(), RECENT_LOG_LIMIT);
        assert_eq!(recent[0].action, format!("action {}", RECENT_LOG_LIMIT + 4));

        let mine = svc.user_logs(user_id).await.unwrap();
        assert_eq!(mine.len(), USER_LOG_LIMIT);
        assert!(svc.user_logs(UserId::new()).await.unwrap().is_empty());
    }
}
