use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use super::storage::SessionStorage;
use crate::models::{Role, User};

/// Storage key holding the JSON-serialized identity.
pub const SESSION_KEY: &str = "currentUser";

const EVENT_BUFFER: usize = 64;

/// Owner of "who is logged in" for this process.
///
/// There is at most one current identity. Every mutation writes through to
/// [`SessionStorage`] and is broadcast to subscribers while the store's lock
/// is held, so subscribers observe transitions in the order they were made.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: Mutex<Option<User>>,
    events: broadcast::Sender<Option<User>>,
}

impl SessionStore {
    /// Restores the persisted identity, if any.
    ///
    /// Missing, unreadable, or malformed state yields an absent session; a
    /// malformed payload is also removed from storage. Never fails.
    pub fn initialize(storage: Arc<dyn SessionStorage>) -> Self {
        let current = restore(storage.as_ref());
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Self {
            storage,
            current: Mutex::new(current),
            events,
        }
    }

    pub fn current(&self) -> Option<User> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.lock().as_ref().is_some_and(|user| user.role == role)
    }

    /// Replaces the current identity, persists it, and notifies subscribers.
    pub fn set_current(&self, user: User) {
        let mut current = self.lock();

        match serde_json::to_string(&user) {
            Ok(payload) => {
                if let Err(e) = self.storage.write(SESSION_KEY, &payload) {
                    tracing::error!(error = %e, user_id = user.id, "Failed to persist session");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = user.id, "Failed to serialize session");
            }
        }

        tracing::info!(user_id = user.id, role = %user.role, "Session established");
        *current = Some(user.clone());
        // No subscribers is not an error.
        let _ = self.events.send(Some(user));
    }

    /// Drops the current identity and its persisted copy, then notifies subscribers.
    pub fn clear(&self) {
        let mut current = self.lock();

        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::error!(error = %e, "Failed to remove persisted session");
        }

        if let Some(previous) = current.take() {
            tracing::info!(user_id = previous.id, "Session cleared");
        }
        let _ = self.events.send(None);
    }

    /// Subscribes to session changes. The value current at subscription time
    /// is delivered first.
    pub fn observe(&self) -> SessionSubscription {
        let current = self.lock();
        SessionSubscription {
            pending: Some(current.clone()),
            receiver: self.events.subscribe(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn restore(storage: &dyn SessionStorage) -> Option<User> {
    let raw = match storage.read(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No persisted session");
            return None;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read persisted session");
            return None;
        }
    };

    match serde_json::from_str::<User>(&raw) {
        Ok(user) => {
            tracing::info!(user_id = user.id, role = %user.role, "Restored persisted session");
            Some(user)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed persisted session");
            if let Err(e) = storage.remove(SESSION_KEY) {
                tracing::error!(error = %e, "Failed to remove malformed session");
            }
            None
        }
    }
}

/// Stream of session values: the value at subscription time, then every change.
///
/// Dropping the subscription unsubscribes. The stream ends only when the
/// store itself is dropped.
pub struct SessionSubscription {
    pending: Option<Option<User>>,
    receiver: broadcast::Receiver<Option<User>>,
}

impl SessionSubscription {
    /// Waits for the next session value. `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Option<User>> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }

        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session subscriber fell behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered session value, without waiting.
    pub fn try_recv(&mut self) -> Option<Option<User>> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }

        loop {
            match self.receiver.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session subscriber fell behind");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
