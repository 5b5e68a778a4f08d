//! In-memory port implementations shared by the service and scheduler tests.

use std::future::Future;
use std::sync::Mutex;

use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::Device;
use homewise_domain::error::HomewiseError;
use homewise_domain::event::DeviceEvent;
use homewise_domain::id::{DeviceId, UserId};
use homewise_domain::recommendation::Suggestion;
use homewise_domain::user::User;

use crate::ports::{
    ActivityLogRepository, DeviceRepository, EventPublisher, SuggestionSink, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepo {
    store: Mutex<Vec<User>>,
}

impl UserRepository for InMemoryUserRepo {
    fn create(&self, user: User) -> impl Future<Output = Result<User, HomewiseError>> + Send {
        self.store.lock().unwrap().push(user.clone());
        async { Ok(user) }
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned();
        async { Ok(result) }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, HomewiseError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, HomewiseError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }
}

/// Keeps devices in insertion order, like the `SQLite` adapter.
#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Mutex<Vec<Device>>,
    fail_reads: Mutex<bool>,
}

impl InMemoryDeviceRepo {
    /// Make every subsequent `find_by_user` call fail.
    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn replace(&self, device: Device) {
        let mut store = self.store.lock().unwrap();
        if let Some(slot) = store.iter_mut().find(|d| d.id == device.id) {
            *slot = device;
        }
    }

    pub fn insert(&self, device: Device) {
        self.store.lock().unwrap().push(device);
    }
}

impl DeviceRepository for InMemoryDeviceRepo {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send {
        self.store.lock().unwrap().push(device.clone());
        async { Ok(device) }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, HomewiseError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn find_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        let result = if *self.fail_reads.lock().unwrap() {
            Err(HomewiseError::Storage("connection lost".into()))
        } else {
            Ok(self
                .store
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.user_id == user_id)
                .cloned()
                .collect())
        };
        async { result }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, HomewiseError>> + Send {
        self.replace(device.clone());
        async { Ok(device) }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), HomewiseError>> + Send {
        self.store.lock().unwrap().retain(|d| d.id != id);
        async { Ok(()) }
    }

    fn delete_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, HomewiseError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|d| d.user_id != user_id);
        let removed = (before - store.len()) as u64;
        async move { Ok(removed) }
    }
}

#[derive(Default)]
pub struct InMemoryLogRepo {
    store: Mutex<Vec<ActivityLog>>,
}

impl InMemoryLogRepo {
    pub fn actions(&self) -> Vec<String> {
        self.store
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.action.clone())
            .collect()
    }
}

impl ActivityLogRepository for InMemoryLogRepo {
    fn append(
        &self,
        log: ActivityLog,
    ) -> impl Future<Output = Result<ActivityLog, HomewiseError>> + Send {
        self.store.lock().unwrap().push(log.clone());
        async { Ok(log) }
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send {
        let result: Vec<_> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityLog>, HomewiseError>> + Send {
        let result: Vec<_> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DeviceEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<DeviceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: DeviceEvent) -> impl Future<Output = Result<(), HomewiseError>> + Send {
        self.events.lock().unwrap().push(event);
        async { Ok(()) }
    }
}

/// What a [`RecordingSink`] observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Suggestion(Option<String>),
    Banner(bool),
}

#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl SuggestionSink for RecordingSink {
    fn on_suggestion(&self, _user_id: UserId, suggestion: Option<&Suggestion>) {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Suggestion(suggestion.map(ToString::to_string)));
    }

    fn on_banner_visibility_change(&self, _user_id: UserId, visible: bool) {
        self.calls.lock().unwrap().push(SinkCall::Banner(visible));
    }
}
