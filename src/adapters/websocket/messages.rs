//! WebSocket frame types for the ingestion channel.

use serde::{Deserialize, Serialize};

use crate::domain::profile::{BiomarkerSample, BiometricSample, UpdateSource};

fn default_device_source() -> UpdateSource {
    UpdateSource::Device
}

/// Frames the gateway accepts from a connected device or client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Sparse biometric readings.
    BiometricUpdate {
        #[serde(default = "default_device_source")]
        source: UpdateSource,
        data: BiometricSample,
        /// Stated reliability in [0, 1]; defaulted per source when absent.
        reliability: Option<f64>,
        device_id: Option<String>,
    },
    /// Lab panel results.
    BiomarkerUpdate {
        #[serde(default = "default_device_source")]
        source: UpdateSource,
        data: BiomarkerSample,
        reliability: Option<f64>,
    },
    /// Client-initiated liveness probe.
    Ping,
}

/// Frames the gateway emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection lifecycle notification.
    DeviceStatus { status: String },
    /// An update was merged; `fields` is the populated field count.
    BiometricUpdate { fields: usize },
    /// A frame was rejected. The connection stays open.
    Error { code: String, message: String },
    Pong,
}

impl ServerMessage {
    pub fn connected() -> Self {
        Self::DeviceStatus {
            status: "connected".to_string(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UnitInterval;

    #[test]
    fn biometric_frame_deserializes() {
        let frame: ClientMessage = serde_json::from_str(
            r#"{"type": "biometric_update", "source": "wearable",
                "data": {"sleep_quality": 0.8}, "device_id": "whoop-2"}"#,
        )
        .unwrap();
        match frame {
            ClientMessage::BiometricUpdate { source, data, device_id, .. } => {
                assert_eq!(source, UpdateSource::Wearable);
                assert_eq!(data.sleep_quality, Some(UnitInterval::new(0.8)));
                assert_eq!(device_id.as_deref(), Some("whoop-2"));
            }
            other => panic!("wrong frame: {:?}", other),
        }
    }

    #[test]
    fn source_defaults_to_device() {
        let frame: ClientMessage =
            serde_json::from_str(r#"{"type": "biometric_update", "data": {}}"#).unwrap();
        match frame {
            ClientMessage::BiometricUpdate { source, .. } => {
                assert_eq!(source, UpdateSource::Device);
            }
            other => panic!("wrong frame: {:?}", other),
        }
    }

    #[test]
    fn server_error_serializes_tagged() {
        let json = serde_json::to_string(&ServerMessage::error("BAD_FRAME", "no")).unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains("BAD_FRAME"));
    }
}
