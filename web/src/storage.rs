use fusion_core::{StateStore, StoreError};
use gloo::storage::{LocalStorage, Storage};

/// `StateStore` backed by the browser's `window.localStorage`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct LocalStore;

impl StateStore for LocalStore {
    fn is_available(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .is_some()
    }

    fn get(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if !self.is_available() {
            return Err(StoreError::Unavailable);
        }
        LocalStorage::raw()
            .set_item(key, &value)
            .map_err(|err| StoreError::Rejected(format!("{:?}", err)))
    }

    fn remove(&mut self, key: &str) {
        if self.is_available() {
            LocalStorage::delete(key);
        }
    }
}
