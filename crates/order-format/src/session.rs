use chrono::{DateTime, Utc};
use design_engine::DesignSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SessionError;
use crate::migrate;

/// Format identifier written into every persisted session.
pub const FORMAT_NAME: &str = "decal-session";

/// Current persisted layout version. Version 1 is the unversioned layout
/// written by the earlier storefront pages.
pub const FORMAT_VERSION: u32 = 2;

/// The persisted session layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub format: String,
    pub version: u32,
    pub saved: DateTime<Utc>,
    pub design: DesignSnapshot,
}

/// Serialize a design snapshot for local storage.
pub fn save_session(snapshot: &DesignSnapshot) -> Result<String, SessionError> {
    let file = SessionFile {
        format: FORMAT_NAME.to_string(),
        version: FORMAT_VERSION,
        saved: Utc::now(),
        design: snapshot.clone(),
    };
    serde_json::to_string(&file).map_err(|e| SessionError::Serialization {
        reason: e.to_string(),
    })
}

/// Deserialize a persisted session.
///
/// Validates the format identifier and version, and migrates older layouts
/// (including the unversioned legacy one) to the current snapshot.
pub fn load_session(json: &str) -> Result<DesignSnapshot, SessionError> {
    let raw: Value =
        serde_json::from_str(json).map_err(|e| SessionError::ParseError(e.to_string()))?;

    let Some(format) = raw.get("format") else {
        return migrate::migrate(raw, 1, FORMAT_VERSION);
    };
    let format = format.as_str().unwrap_or_default();
    if format != FORMAT_NAME {
        return Err(SessionError::UnknownFormat(format.to_string()));
    }

    let version = raw
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| SessionError::ParseError("missing session version".to_string()))?;
    let version = u32::try_from(version)
        .map_err(|_| SessionError::ParseError(format!("session version {version} is out of range")))?;
    if version > FORMAT_VERSION {
        return Err(SessionError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        });
    }
    if version < FORMAT_VERSION {
        return migrate::migrate(raw, version, FORMAT_VERSION);
    }

    let file: SessionFile =
        serde_json::from_value(raw).map_err(|e| SessionError::ParseError(e.to_string()))?;
    Ok(file.design)
}
