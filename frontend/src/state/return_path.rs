use crate::utils::storage::{self, SharedStore};

pub const RETURN_PATH_KEY: &str = "return_path";

/// Single slot holding the last location the guard turned away.
#[derive(Clone)]
pub struct ReturnPath {
    store: SharedStore,
}

impl ReturnPath {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Slot kept in the tab's `sessionStorage`, apart from the session itself.
    pub fn platform() -> Self {
        Self::new(storage::transient_store())
    }

    /// Overwrites any pending location.
    pub fn remember(&self, location: &str) {
        if let Err(err) = self.store.set(RETURN_PATH_KEY, location) {
            log::warn!("{}", err);
        }
    }

    pub fn peek(&self) -> Option<String> {
        self.store.get(RETURN_PATH_KEY)
    }

    /// Reads and clears the slot. Anything that is not an in-app absolute path
    /// is dropped rather than replayed.
    pub fn take(&self) -> Option<String> {
        let value = self.store.get(RETURN_PATH_KEY)?;
        self.store.remove(RETURN_PATH_KEY);
        if is_in_app_path(&value) {
            Some(value)
        } else {
            log::warn!("discarding return path {:?}", value);
            None
        }
    }
}

fn is_in_app_path(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//") && !value.contains('\\')
}
