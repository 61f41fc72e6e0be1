//! Notification channel trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::notify::Notification;

/// Error returned by a notification channel.
#[derive(Debug, Error, Clone)]
#[error("Channel error: {0}")]
pub struct ChannelError(pub String);

/// A single delivery channel (customer email, operator email, customer
/// messaging).
///
/// Channels are fire-and-forget from the orchestrator's viewpoint: they
/// are assumed to have their own retry guarantees or to be acceptably
/// lossy.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name used in logs and metrics.
    fn name(&self) -> &str;

    /// Delivers one notification.
    async fn send(&self, notification: &Notification) -> Result<(), ChannelError>;
}

#[derive(Debug, Default)]
struct RecordingChannelState {
    sent: Vec<Notification>,
    fail: bool,
}

/// In-memory channel for testing: records everything it delivers.
#[derive(Debug, Clone)]
pub struct RecordingChannel {
    name: String,
    state: Arc<RwLock<RecordingChannelState>>,
}

impl RecordingChannel {
    /// Creates a named recording channel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    /// Configures the channel to fail deliveries.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Returns the number of notifications delivered.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns the kinds of the delivered notifications, in order.
    pub fn sent_kinds(&self) -> Vec<&'static str> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .map(|n| n.kind())
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, notification: &Notification) -> Result<(), ChannelError> {
        let mut state = self.state.write().unwrap();

        if state.fail {
            return Err(ChannelError(format!("{} unavailable", self.name)));
        }

        state.sent.push(notification.clone());
        Ok(())
    }
}
