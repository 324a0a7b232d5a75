//! Browser storage behind [`SessionStore`]
//!
//! Everything lives in `sessionStorage` except the plain access token copy, which goes to
//! `localStorage` for code that reads it from there.

use gloo::storage::{LocalStorage, SessionStorage, Storage};
use taproom_core::storage::keys;
use taproom_core::{AuthError, AuthResult, SessionStore};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn backend(key: &str) -> web_sys::Storage {
        if key == keys::ACCESS_TOKEN {
            LocalStorage::raw()
        } else {
            SessionStorage::raw()
        }
    }
}

fn storage_error(e: JsValue) -> AuthError {
    AuthError::Storage(format!("{e:?}"))
}

impl SessionStore for BrowserStore {
    fn get_item(&self, key: &str) -> AuthResult<Option<String>> {
        Self::backend(key).get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> AuthResult<()> {
        Self::backend(key).set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&self, key: &str) -> AuthResult<()> {
        Self::backend(key).remove_item(key).map_err(storage_error)
    }
}
