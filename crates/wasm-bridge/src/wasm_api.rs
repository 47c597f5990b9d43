//! WASM entry points for the storefront page.
//!
//! Only compiled for the `wasm32` target. The page calls `init` once and then
//! feeds JSON `UiToEngine` messages to `process_message`.

use std::cell::RefCell;

use chrono::Utc;
use design_engine::CustomizerConfig;
use order_format::{SessionStore, StoreError};
use wasm_bindgen::prelude::*;
use web_sys::Storage;

use crate::dispatch;
use crate::messages::{EngineToUi, UiToEngine};
use crate::session::{BridgeError, CustomizerSession};

// Single customizer per page.
thread_local! {
    static SESSION: RefCell<Option<CustomizerSession>> = const { RefCell::new(None) };
}

/// `window.localStorage`, looked up on every call.
struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .ok_or(StoreError::Unavailable)?
            .local_storage()
            .map_err(|_| StoreError::Unavailable)?
            .ok_or(StoreError::Unavailable)
    }
}

impl SessionStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::WriteFailed {
                reason: format!("{:?}", e),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StoreError::WriteFailed {
                reason: format!("{:?}", e),
            })
    }
}

/// Initialize the customizer. `config_json` may be empty for the defaults.
///
/// Restores the design left in local storage by a previous page, if any.
#[wasm_bindgen]
pub fn init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config: CustomizerConfig = if config_json.trim().is_empty() {
        CustomizerConfig::default()
    } else {
        serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("invalid customizer config: {}", e)))?
    };

    let mut session = CustomizerSession::new(config, Box::new(LocalStorageStore));
    if let Err(e) = session.restore_session() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "stored design discarded: {}",
            e
        )));
    }

    SESSION.with(|cell| {
        *cell.borrow_mut() = Some(session);
    });
    Ok(())
}

/// Process a JSON `UiToEngine` message and return a JSON `EngineToUi` response.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    let response = SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        let Some(session) = session.as_mut() else {
            return dispatch::error_response(&BridgeError::NotInitialized);
        };

        let msg: UiToEngine = match serde_json::from_str(json_input) {
            Ok(msg) => msg,
            Err(e) => {
                return dispatch::error_response(&BridgeError::Serialization {
                    reason: format!("failed to parse message: {}", e),
                });
            }
        };

        dispatch::dispatch(session, msg, Utc::now())
    });

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Error","kind":"Serialization","message":"serialization failed: {}"}}"#,
            e
        )
    })
}

/// Current design view and decals as JSON, without sending a command.
#[wasm_bindgen]
pub fn get_state() -> String {
    process_message(r#"{"type":"GetState"}"#)
}

/// Catalog of regions and assets as JSON.
#[wasm_bindgen]
pub fn get_catalog() -> String {
    let response = SESSION.with(|cell| match cell.borrow().as_ref() {
        Some(session) => EngineToUi::Catalog {
            regions: session.registry().list_regions().to_vec(),
            assets: session.assets(),
        },
        None => dispatch::error_response(&BridgeError::NotInitialized),
    });
    serde_json::to_string(&response).unwrap_or_default()
}
