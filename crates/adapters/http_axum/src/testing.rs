//! Stub repositories for router-level tests.

use std::sync::{Arc, Mutex, PoisonError};

use homewise_app::event_bus::InProcessEventBus;
use homewise_app::ports::{ActivityLogRepository, DeviceRepository, UserRepository};
use homewise_app::services::admin_service::AdminService;
use homewise_app::services::device_service::DeviceService;
use homewise_app::services::user_service::UserService;
use homewise_app::suggestion::{BroadcastSuggestionSink, EngineSettings, SuggestionHub};
use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::Device;
use homewise_domain::error::HomewiseError;
use homewise_domain::id::{DeviceId, UserId};
use homewise_domain::user::User;

use crate::state::AppState;

pub(crate) struct StubUserRepo(Mutex<Vec<User>>);
pub(crate) struct StubDeviceRepo;
pub(crate) struct StubLogRepo;

impl StubUserRepo {
    fn users(&self) -> Vec<User> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl UserRepository for StubUserRepo {
    async fn create(&self, user: User) -> Result<User, HomewiseError> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user.clone());
        Ok(user)
    }
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, HomewiseError> {
        Ok(self.users().into_iter().find(|user| user.id == id))
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, HomewiseError> {
        Ok(self.users().into_iter().find(|user| user.email == email))
    }
    async fn get_all(&self) -> Result<Vec<User>, HomewiseError> {
        Ok(self.users())
    }
}

impl DeviceRepository for StubDeviceRepo {
    async fn create(&self, device: Device) -> Result<Device, HomewiseError> {
        Ok(device)
    }
    async fn get_by_id(&self, _id: DeviceId) -> Result<Option<Device>, HomewiseError> {
        Ok(None)
    }
    async fn get_all(&self) -> Result<Vec<Device>, HomewiseError> {
        Ok(vec![])
    }
    async fn find_by_user(&self, _user_id: UserId) -> Result<Vec<Device>, HomewiseError> {
        Ok(vec![])
    }
    async fn update(&self, device: Device) -> Result<Device, HomewiseError> {
        Ok(device)
    }
    async fn delete(&self, _id: DeviceId) -> Result<(), HomewiseError> {
        Ok(())
    }
    async fn delete_by_user(&self, _user_id: UserId) -> Result<u64, HomewiseError> {
        Ok(0)
    }
}

impl ActivityLogRepository for StubLogRepo {
    async fn append(&self, log: ActivityLog) -> Result<ActivityLog, HomewiseError> {
        Ok(log)
    }
    async fn get_recent(&self, _limit: usize) -> Result<Vec<ActivityLog>, HomewiseError> {
        Ok(vec![])
    }
    async fn find_by_user(
        &self,
        _user_id: UserId,
        _limit: usize,
    ) -> Result<Vec<ActivityLog>, HomewiseError> {
        Ok(vec![])
    }
}

pub(crate) type StubState =
    AppState<Arc<StubUserRepo>, Arc<StubDeviceRepo>, Arc<StubLogRepo>, InProcessEventBus>;

pub(crate) fn stub_state() -> StubState {
    stub_state_with_users(Vec::new())
}

pub(crate) fn stub_state_with_users(users: Vec<User>) -> StubState {
    let users = Arc::new(StubUserRepo(Mutex::new(users)));
    let devices = Arc::new(StubDeviceRepo);
    let logs = Arc::new(StubLogRepo);

    let device_service = Arc::new(DeviceService::new(
        Arc::clone(&devices),
        Arc::clone(&users),
        Arc::clone(&logs),
        InProcessEventBus::new(16),
    ));
    let sink = BroadcastSuggestionSink::new(16);
    let hub = Arc::new(SuggestionHub::new(
        Arc::clone(&device_service),
        sink.clone(),
        EngineSettings::default(),
    ));

    AppState::from_arcs(
        Arc::new(UserService::new(Arc::clone(&users))),
        device_service,
        Arc::new(AdminService::new(users, devices, logs)),
        hub,
        sink,
    )
}
