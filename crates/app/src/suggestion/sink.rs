//! Broadcast sink that fans suggestion updates out to streaming clients.

use serde::Serialize;
use tokio::sync::broadcast;

use homewise_domain::id::UserId;
use homewise_domain::recommendation::Suggestion;

use crate::ports::SuggestionSink;

/// One scheduler output, addressed to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionUpdate {
    pub user_id: UserId,
    #[serde(flatten)]
    pub kind: SuggestionUpdateKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionUpdateKind {
    Suggestion { suggestion: Option<Suggestion> },
    Banner { visible: bool },
}

/// [`SuggestionSink`] backed by a tokio [`broadcast`] channel.
///
/// Updates sent while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastSuggestionSink {
    sender: broadcast::Sender<SuggestionUpdate>,
}

impl BroadcastSuggestionSink {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SuggestionUpdate> {
        self.sender.subscribe()
    }

    fn send(&self, update: SuggestionUpdate) {
        let _ = self.sender.send(update);
    }
}

impl SuggestionSink for BroadcastSuggestionSink {
    fn on_suggestion(&self, user_id: UserId, suggestion: Option<&Suggestion>) {
        self.send(SuggestionUpdate {
            user_id,
            kind: SuggestionUpdateKind::Suggestion {
                suggestion: suggestion.cloned(),
            },
        });
    }

    fn on_banner_visibility_change(&self, user_id: UserId, visible: bool) {
        self.send(SuggestionUpdate {
            user_id,
            kind: SuggestionUpdateKind::Banner { visible },
        });
    }
}
