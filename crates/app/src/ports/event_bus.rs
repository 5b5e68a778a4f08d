//! Event bus port: publish/subscribe for device events.

use std::future::Future;

use homewise_domain::error::HomewiseError;
use homewise_domain::event::DeviceEvent;

/// Publishes device events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: DeviceEvent) -> impl Future<Output = Result<(), HomewiseError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: DeviceEvent) -> impl Future<Output = Result<(), HomewiseError>> + Send {
        (**self).publish(event)
    }
}
