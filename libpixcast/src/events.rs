//! Publish progress events
//!
//! An in-process broadcast bus the dispatcher reports through. Subscribers
//! (the CLI, tests) receive every event emitted after they subscribe; with no
//! subscribers, events are dropped.
//!
//! ```
//! use libpixcast::events::{Event, EventBus};
//!
//! # async fn example() {
//! let bus = EventBus::new(32);
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(Event::PlatformUnsupported {
//!     request_id: "abc".to_string(),
//!     name: "myspace".to_string(),
//! });
//!
//! let event = receiver.recv().await.unwrap();
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::PlatformId;

pub type EventReceiver = broadcast::Receiver<Event>;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// `capacity` is the per-subscriber buffer; lagging subscribers lose the
    /// oldest events first
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Non-blocking. Dropped when nobody is listening.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PublishStarted {
        request_id: String,
        /// Identifiers exactly as requested, recognized or not
        platforms: Vec<String>,
    },

    PlatformSucceeded {
        request_id: String,
        platform: PlatformId,
        post_id: Option<String>,
    },

    PlatformFailed {
        request_id: String,
        platform: PlatformId,
        error: String,
        /// Set when media was uploaded but the post was never created
        orphaned_media_id: Option<String>,
    },

    PlatformUnsupported {
        request_id: String,
        name: String,
    },

    PublishCompleted {
        request_id: String,
        succeeded: usize,
        failed: usize,
        unsupported: usize,
    },
}
