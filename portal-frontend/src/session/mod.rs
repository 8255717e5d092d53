pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{SESSION_KEY, SessionStore, SessionSubscription};
