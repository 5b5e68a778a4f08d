//! Suggestion ports: where the scheduler reads devices from and where it
//! sends its results.

use std::future::Future;
use std::sync::Arc;

use homewise_domain::device::Device;
use homewise_domain::error::HomewiseError;
use homewise_domain::id::UserId;
use homewise_domain::recommendation::Suggestion;

/// Read-only view of one user's devices, in a stable order.
pub trait DeviceSnapshotSource {
    fn fetch_snapshot(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send;
}

impl<T: DeviceSnapshotSource + Send + Sync> DeviceSnapshotSource for Arc<T> {
    fn fetch_snapshot(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Device>, HomewiseError>> + Send {
        (**self).fetch_snapshot(user_id)
    }
}

/// Receives the scheduler's output.
///
/// Called from the scheduler task, so implementations must not block.
pub trait SuggestionSink {
    /// The current suggestion after an evaluation (`None` when nothing applies).
    fn on_suggestion(&self, user_id: UserId, suggestion: Option<&Suggestion>);

    /// The transient banner was shown or hidden.
    fn on_banner_visibility_change(&self, user_id: UserId, visible: bool);
}

impl<T: SuggestionSink + ?Sized> SuggestionSink for Arc<T> {
    fn on_suggestion(&self, user_id: UserId, suggestion: Option<&Suggestion>) {
        (**self).on_suggestion(user_id, suggestion);
    }

    fn on_banner_visibility_change(&self, user_id: UserId, visible: bool) {
        (**self).on_banner_visibility_change(user_id, visible);
    }
}
