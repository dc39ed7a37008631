//! JSON wire format between the view and the data source.
//!
//! ```text
//! request:  { "clock": "YYYY/MM/DD HH:MM:SS", "zoom_level": i32,
//!             "pan": { "x": f32, "y": f32 }, "selection": string | null }
//! success:  { "snapshot": {...}, "status": {...}?, "selected_entity_info": {...}? }
//! failure:  { "error": string }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::snapshot::Snapshot;

/// Floats per view event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Floats per tessellated vertex: x, y, r, g, b, a.
pub const VERTEX_FLOATS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub clock: String,
    pub zoom_level: i32,
    pub pan: PanOffset,
    pub selection: Option<String>,
}

impl SyncRequest {
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

/// Server-confirmed status summary. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSummary {
    pub zoom_level: Option<i32>,
    pub mode_label: Option<String>,
    pub clock: Option<String>,
    pub scale_info: Option<String>,
    pub selected: Option<String>,
}

/// Descriptive facts about the selected body. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moons: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable_features: Option<String>,
    /// Anything else the source sends along.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub snapshot: Snapshot,
    #[serde(default)]
    pub status: Option<StatusSummary>,
    #[serde(default)]
    pub selected_entity_info: Option<EntityInfo>,
}

/// Why a sync round trip produced no snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The request never completed (network down, aborted fetch).
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The source answered with `{ "error": ... }`. Shown verbatim.
    #[error("{0}")]
    Server(String),
    /// The body was not a valid response.
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Failure { error: String },
    Success(Box<SyncResponse>),
}

/// Decode a response body.
///
/// A malformed `status` object is dropped rather than failing the whole
/// response, so the snapshot still lands and the status falls back.
pub fn decode_response(body: &str) -> Result<SyncResponse, SyncError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))?;
    let value = strip_malformed_status(value);
    match serde_json::from_value::<Envelope>(value) {
        Ok(Envelope::Failure { error }) => Err(SyncError::Server(error)),
        Ok(Envelope::Success(response)) => Ok(*response),
        Err(e) => Err(SyncError::Decode(e.to_string())),
    }
}

/// Extract the `error` message from a non-success body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Failure {
        error: String,
    }
    serde_json::from_str::<Failure>(body).ok().map(|f| f.error)
}

fn strip_malformed_status(mut value: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = value.as_object_mut() {
        let malformed = obj
            .get("status")
            .map(|s| serde_json::from_value::<StatusSummary>(s.clone()).is_err())
            .unwrap_or(false);
        if malformed {
            log::warn!("dropping malformed status payload");
            obj.remove("status");
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::LevelRange;

    const SNAPSHOT: &str = r#"{
        "level": "solar_system",
        "center": {"name": "Sonne", "x": 300, "y": 300, "radius": 20, "color": "yellow"},
        "bodies": [{"name": "Erde", "x": 400, "y": 300, "radius": 4, "point_radius": 4, "color": "blue"}],
        "orbits": [{"name": "Merkur", "radius": 50}]
    }"#;

    #[test]
    fn request_serializes_wire_names() {
        let req = SyncRequest {
            clock: "2024/01/02 03:04:05".into(),
            zoom_level: -3,
            pan: PanOffset { x: 1.5, y: -2.0 },
            selection: None,
        };
        let json: serde_json::Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(json["clock"], "2024/01/02 03:04:05");
        assert_eq!(json["zoom_level"], -3);
        assert_eq!(json["pan"]["x"], 1.5);
        assert!(json["selection"].is_null());
    }

    #[test]
    fn decodes_success_with_info_extras() {
        let body = format!(
            r#"{{"snapshot": {SNAPSHOT},
                "status": {{"mode_label": "DIDACTIC", "zoom_level": -10}},
                "selected_entity_info": {{"diameter_km": 12742, "rings": false}}}}"#
        );
        let resp = decode_response(&body).unwrap();
        assert_eq!(resp.snapshot.level, LevelRange::SolarSystem);
        let status = resp.status.unwrap();
        assert_eq!(status.mode_label.as_deref(), Some("DIDACTIC"));
        assert_eq!(status.clock, None);
        let info = resp.selected_entity_info.unwrap();
        assert_eq!(info.diameter_km, Some(12742.0));
        assert_eq!(info.extra.get("rings"), Some(&serde_json::Value::Bool(false)));
    }

    #[test]
    fn error_body_is_server_error() {
        assert_eq!(
            decode_response(r#"{"error": "bad date"}"#),
            Err(SyncError::Server("bad date".into()))
        );
        assert_eq!(error_message(r#"{"error": "boom"}"#).as_deref(), Some("boom"));
    }

    #[test]
    fn server_error_displays_message_verbatim() {
        let err = decode_response(r#"{"error": "Ungültiges Datum"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Ungültiges Datum");
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn malformed_status_is_dropped() {
        let body = format!(r#"{{"snapshot": {SNAPSHOT}, "status": "oops"}}"#);
        let resp = decode_response(&body).unwrap();
        assert!(resp.status.is_none());
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(decode_response("not json"), Err(SyncError::Decode(_))));
        assert!(matches!(decode_response(r#"{"status": {}}"#), Err(SyncError::Decode(_))));
    }
}
