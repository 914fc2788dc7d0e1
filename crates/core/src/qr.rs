//! QR code payload carried on PV documents.
//!
//! Only the payload is built here. Drawing the symbol is delegated to a
//! [`QrEncoder`] implementation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// What the scanned document is about. Codes printed by other tools may
/// carry `project`; this crate emits `pv` and `reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrKind {
    #[default]
    Pv,
    Reserve,
    Project,
}

/// JSON object encoded in the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub pv_number: String,
    /// Document date as printed.
    pub date: String,
    pub id: EntityId,
    #[serde(rename = "type", default)]
    pub kind: QrKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Generation instant in epoch milliseconds.
    pub timestamp: i64,
}

impl QrPayload {
    pub fn new(
        pv_number: impl Into<String>,
        date: impl Into<String>,
        id: impl Into<EntityId>,
        kind: QrKind,
        title: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            pv_number: pv_number.into(),
            date: date.into(),
            id: id.into(),
            kind,
            title,
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Internal(format!("QR payload encoding failed: {e}")))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid QR payload: {e}")))
    }
}

/// Error correction level of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

/// Raster options passed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct QrOptions {
    pub width_px: u32,
    pub margin_modules: u32,
    pub dark: &'static str,
    pub light: &'static str,
    pub error_correction: ErrorCorrection,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width_px: 200,
            margin_modules: 2,
            dark: "#000000",
            light: "#FFFFFF",
            error_correction: ErrorCorrection::Medium,
        }
    }
}

/// Draws a QR symbol as PNG bytes.
pub trait QrEncoder {
    fn encode_png(&self, data: &str, options: &QrOptions) -> Result<Vec<u8>, CoreError>;
}

/// `QR_<pv number>_<date>.png`, slashes in the date replaced.
pub fn qr_filename(pv_number: &str, date: &str) -> String {
    format!("QR_{pv_number}_{}.png", date.replace('/', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_decodes_to_same_structure() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let payload = QrPayload::new(
            "PV-Tour-10-01-2024",
            "10/01/2024",
            "rec1",
            QrKind::Pv,
            Some("Réception".into()),
            now,
        );
        let raw = payload.encode().unwrap();
        assert!(raw.contains("\"pvNumber\":\"PV-Tour-10-01-2024\""));
        assert!(raw.contains("\"type\":\"pv\""));
        assert!(raw.contains(&format!("\"timestamp\":{}", now.timestamp_millis())));
        assert_eq!(QrPayload::decode(&raw).unwrap(), payload);
    }

    #[test]
    fn missing_type_defaults_to_pv() {
        let raw = r#"{"pvNumber":"PV-1","date":"01/01/2024","id":"x","timestamp":0}"#;
        let payload = QrPayload::decode(raw).unwrap();
        assert_eq!(payload.kind, QrKind::Pv);
        assert!(payload.title.is_none());
    }

    #[test]
    fn every_document_type_is_readable() {
        for (wire, kind) in [
            ("pv", QrKind::Pv),
            ("reserve", QrKind::Reserve),
            ("project", QrKind::Project),
        ] {
            let raw = format!(
                r#"{{"pvNumber":"PV-1","date":"01/01/2024","id":"x","type":"{wire}","timestamp":0}}"#
            );
            assert_eq!(QrPayload::decode(&raw).unwrap().kind, kind);
        }
    }

    #[test]
    fn garbage_is_a_validation_error() {
        assert!(matches!(
            QrPayload::decode("not json"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn filename_has_no_slashes() {
        assert_eq!(qr_filename("PV-A", "10/01/2024"), "QR_PV-A_10-01-2024.png");
    }
}
