//! Device service: use-cases for managing a user's devices.
//!
//! Every mutation appends an [`ActivityLog`] entry and publishes a
//! [`DeviceEvent`] so the suggestion scheduler can re-evaluate.

use std::future::Future;

use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::{Device, DeviceSettings};
use homewise_domain::error::{HomewiseError, NotFoundError};
use homewise_domain::event::{DeviceEvent, DeviceEventKind};
use homewise_domain::id::{DeviceId, UserId};
use homewise_domain::time::now;

use crate::ports::{
    ActivityLogRepository, DeviceRepository, DeviceSnapshotSource, EventPublisher, UserRepository,
};

/// Application service for device CRUD operations.
pub struct DeviceService<DR, UR, LR, P> {
    devices: DR,
    users: UR,
    logs: LR,
    publisher: P,
}

impl<DR, UR, LR, P> DeviceService<DR, UR, LR, P>
where
    DR: DeviceRepository,
    UR: UserRepository,
    LR: ActivityLogRepository,
    P: EventPublisher,
{
    /// Create a new service backed by the given ports.
    pub fn new(devices: DR, users: UR, logs: LR, publisher: P) -> Self {
        Self {
            devices,
            users,
            logs,
            publisher,
        }
    }

    /// Add a device to its owner's fleet.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] if invariants fail,
    /// [`HomewiseError::NotFound`] if the owner does not exist, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self, device), fields(user_id = %device.user_id, device_name = %device.name))]
    pub async fn add_device(&self, device: Device) -> Result<Device, HomewiseError> {
        device.validate()?;
        self.ensure_user(device.user_id).await?;
        let device = self.devices.create(device).await?;
        self.record(
            ActivityLog::device_added(&device, device.created_at),
            DeviceEventKind::Added,
        )
        .await?;
        Ok(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, HomewiseError> {
        self.devices.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List one user's devices in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] if the user does not exist, or a
    /// storage error from the repositories.
    pub async fn list_user_devices(&self, user_id: UserId) -> Result<Vec<Device>, HomewiseError> {
        self.ensure_user(user_id).await?;
        self.devices.find_by_user(user_id).await
    }

    /// List every device of every user.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_all_devices(&self) -> Result<Vec<Device>, HomewiseError> {
        self.devices.get_all().await
    }

    /// Flip a device between on and off.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] when the device does not exist,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_device(&self, id: DeviceId) -> Result<Device, HomewiseError> {
        let mut device = self.get_device(id).await?;
        let ts = now();
        device.toggle(ts);
        let device = self.devices.update(device).await?;
        tracing::debug!(status = %device.status, "device toggled");
        self.record(ActivityLog::device_toggled(&device, ts), DeviceEventKind::Toggled)
            .await?;
        Ok(device)
    }

    /// Apply a partial settings update (status, temperature, speed).
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] when the device does not exist,
    /// [`HomewiseError::Validation`] when a value is out of range, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn update_device_settings(
        &self,
        id: DeviceId,
        settings: DeviceSettings,
    ) -> Result<Device, HomewiseError> {
        let mut device = self.get_device(id).await?;
        let ts = now();
        device.apply_settings(settings, ts)?;
        let device = self.devices.update(device).await?;
        self.record(ActivityLog::device_updated(&device, ts), DeviceEventKind::Updated)
            .await?;
        Ok(device)
    }

    /// Delete a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] when the device does not exist,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), HomewiseError> {
        let device = self.get_device(id).await?;
        self.devices.delete(id).await?;
        self.record(ActivityLog::device_deleted(&device, now()), DeviceEventKind::Deleted)
            .await
    }

    /// Remove every device a user owns, returning how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::NotFound`] if the user does not exist, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn clear_user_devices(&self, user_id: UserId) -> Result<u64, HomewiseError> {
        self.ensure_user(user_id).await?;
        let removed = self.devices.delete_by_user(user_id).await?;
        let count = usize::try_from(removed).unwrap_or(usize::MAX);
        self.record(
            ActivityLog::devices_cleared(user_id, count, now()),
            DeviceEventKind::Cleared,
        )
        .await?;
        Ok(removed)
    }

    async fn ensure_user(&self, user_id: UserId) -> Result<(), HomewiseError> {
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "User",
                id: user_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Append the log entry, then notify subscribers (fire-and-forget).
    async fn record(&self, log: ActivityLog, kind: DeviceEventKind) -> Result<(), HomewiseError> {
        let event = DeviceEvent::new(kind, log.user_id, log.device_id, log.timestamp);
        self.logs.append(log).await?;
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(error = %err, "failed to publish device event");
        }
        Ok(())
    }
}

impl<DR, UR, LR, P> DeviceSnapshotSource for DeviceService<DR, UR, LR, P>
where
    DR: DeviceRepository + Send + Sync,
    UR: Send + Sync,
    LR: Send + Sync,
    P: Send + Sync,
{
    fn fetch_snapshot(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        self.devices.find_by_user(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryDeviceRepo, InMemoryLogRepo, InMemoryUserRepo, RecordingPublisher};
    use homewise_domain::device::{DeviceKind, PowerState};
    use homewise_domain::error::ValidationError;
    use homewise_domain::user::User;
    use std::sync::Arc;

    type Service = DeviceService<
        Arc<InMemoryDeviceRepo>,
        Arc<InMemoryUserRepo>,
        Arc<InMemoryLogRepo>,
        Arc<RecordingPublisher>,
    >;

    struct Fixture {
        svc: Service,
        logs: Arc<InMemoryLogRepo>,
        publisher: Arc<RecordingPublisher>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepo::default());
        let user = User::builder().email("owner@example.com").build().unwrap();
        users.create(user.clone()).await.unwrap();
        let logs = Arc::new(InMemoryLogRepo::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = DeviceService::new(
            Arc::new(InMemoryDeviceRepo::default()),
            users,
            Arc::clone(&logs),
            Arc::clone(&publisher),
        );
        Fixture {
            svc,
            logs,
            publisher,
            user,
        }
    }

    fn ac(user_id: UserId) -> Device {
        Device::builder()
            .user_id(user_id)
            .name("Bedroom AC")
            .brand("Daikin")
            .kind(DeviceKind::Ac)
            .room("Bedroom")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_add_device_log_and_publish() {
        let f = fixture().await;
        let device = f.svc.add_device(ac(f.user.id)).await.unwrap();

        assert_eq!(f.svc.get_device(device.id).await.unwrap(), device);
        assert_eq!(f.logs.actions(), vec!["Added device \"Bedroom AC\""]);
        let events = f.publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, DeviceEventKind::Added);
        assert_eq!(events[0].device_id, Some(device.id));
    }

    #[tokio::test]
    async fn should_reject_device_for_unknown_user() {
        let f = fixture().await;
        let result = f.svc.add_device(ac(UserId::new())).await;
        assert!(matches!(result, Err(HomewiseError::NotFound(_))));
        assert!(f.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn should_toggle_device() {
        let f = fixture().await;
        let device = f.svc.add_device(ac(f.user.id)).await.unwrap();

        let toggled = f.svc.toggle_device(device.id).await.unwrap();
        assert_eq!(toggled.status, PowerState::On);
        assert_eq!(
            f.logs.actions().last().map(String::as_str),
            Some("Toggled device \"Bedroom AC\"")
        );
        assert_eq!(f.publisher.events()[1].kind, DeviceEventKind::Toggled);
    }

    #[tokio::test]
    async fn should_update_settings_partially() {
        let f = fixture().await;
        let device = f.svc.add_device(ac(f.user.id)).await.unwrap();

        let updated = f
            .svc
            .update_device_settings(
                device.id,
                DeviceSettings {
                    temperature: Some(18.0),
                    ..DeviceSettings::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.temperature, Some(18.0));
        assert_eq!(updated.status, PowerState::Off);
    }

    #[tokio::test]
    async fn should_reject_out_of_range_settings_without_side_effects() {
        let f = fixture().await;
        let device = f.svc.add_device(ac(f.user.id)).await.unwrap();

        let result = f
            .svc
            .update_device_settings(
                device.id,
                DeviceSettings {
                    temperature: Some(40.0),
                    ..DeviceSettings::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(HomewiseError::Validation(
                ValidationError::TemperatureOutOfRange(_)
            ))
        ));
        assert_eq!(f.publisher.events().len(), 1);
    }

    #[tokio::test]
    async fn should_delete_device() {
        let f = fixture().await;
        let device = f.svc.add_device(ac(f.user.id)).await.unwrap();

        f.svc.delete_device(device.id).await.unwrap();

        let result = f.svc.get_device(device.id).await;
        assert!(matches!(result, Err(HomewiseError::NotFound(_))));
        assert_eq!(f.publisher.events()[1].kind, DeviceEventKind::Deleted);
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_device() {
        let f = fixture().await;
        let result = f.svc.delete_device(DeviceId::new()).await;
        assert!(matches!(result, Err(HomewiseError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_user_devices_in_insertion_order() {
        let f = fixture().await;
        let first = f.svc.add_device(ac(f.user.id)).await.unwrap();
        let second = f
            .svc
            .add_device(
                Device::builder()
                    .user_id(f.user.id)
                    .name("Desk Lamp")
                    .brand("Ikea")
                    .kind(DeviceKind::Light)
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();

        let ids: Vec<_> = f
            .svc
            .list_user_devices(f.user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let snapshot = f.svc.fetch_snapshot(f.user.id).await.unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn should_clear_user_devices() {
        let f = fixture().await;
        f.svc.add_device(ac(f.user.id)).await.unwrap();
        f.svc.add_device(ac(f.user.id)).await.unwrap();

        let removed = f.svc.clear_user_devices(f.user.id).await.unwrap();
        assert_eq!(removed, 2);
        assert!(f.svc.list_all_devices().await.unwrap().is_empty());
        assert_eq!(
            f.logs.actions().last().map(String::as_str),
            Some("Removed all 2 devices")
        );
        let last = f.publisher.events().pop().unwrap();
        assert_eq!(last.kind, DeviceEventKind::Cleared);
        assert_eq!(last.device_id, None);
    }
}
