//! WebSocket ingestion gateway.
//!
//! Accepts `ClientMessage` frames, normalizes them, and feeds the same
//! ingestion handler the REST fallback uses. A malformed or rejected
//! frame produces an error event and leaves the connection open; only
//! transport failures close it, after the backoff budget is spent.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::adapters::http::handlers::AuthenticatedUser;
use crate::application::handlers::IngestUpdateHandler;
use crate::domain::foundation::{DeviceId, Timestamp, UnitInterval, UserId};
use crate::domain::profile::{default_reliability, UpdateKind};
use crate::ports::NormalizedUpdate;

use super::messages::{ClientMessage, ServerMessage};
use super::reconnect::{ConnectionMachine, ReconnectPolicy};

pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

/// State for the ingestion socket.
#[derive(Clone)]
pub struct WsState {
    pub ingest: Arc<IngestUpdateHandler>,
    pub heartbeat_interval: Duration,
}

/// GET /ws/biometrics - upgrade to the ingestion channel.
pub async fn ws_ingest(
    ws: WebSocketUpgrade,
    State(state): State<WsState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, state, user.user_id))
}

async fn run_session(mut socket: WebSocket, state: WsState, user_id: UserId) {
    let mut machine = ConnectionMachine::new(ReconnectPolicy::default());
    machine.on_connect_started();

    if send_json(&mut socket, &ServerMessage::connected()).await.is_err() {
        return;
    }
    machine.on_established();
    debug!(user_id = %user_id, "ingestion channel open");

    let mut heartbeat = tokio::time::interval(state.heartbeat_interval);
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if socket.send(Message::Ping(Vec::new())).await.is_err() {
                    warn!(user_id = %user_id, "heartbeat failed; closing channel");
                    break;
                }
            }
            frame = socket.recv() => {
                match frame {
                    None | Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Text(text))) => {
                        let reply = process_frame(&state.ingest, user_id, &text).await;
                        if send_json(&mut socket, &reply).await.is_err() {
                            break;
                        }
                    }
                    // Transport-level pings and pongs are handled by axum;
                    // binary frames are not part of the protocol.
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        match machine.on_error() {
                            Some(delay) => {
                                warn!(user_id = %user_id, error = %err, "transport error; backing off");
                                tokio::time::sleep(delay).await;
                            }
                            None => {
                                warn!(user_id = %user_id, "max reconnect budget reached; closing");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }
    debug!(user_id = %user_id, "ingestion channel closed");
}

async fn send_json(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    // ServerMessage serialization is infallible for these shapes.
    let text = serde_json::to_string(message).unwrap_or_default();
    socket.send(Message::Text(text)).await
}

/// Handles one text frame and produces the reply event.
async fn process_frame(
    ingest: &IngestUpdateHandler,
    user_id: UserId,
    text: &str,
) -> ServerMessage {
    let frame: ClientMessage = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => return ServerMessage::error("BAD_FRAME", err.to_string()),
    };

    let update = match frame {
        ClientMessage::Ping => return ServerMessage::Pong,
        ClientMessage::BiometricUpdate {
            source,
            data,
            reliability,
            device_id,
        } => {
            let device_id = match device_id.map(DeviceId::new).transpose() {
                Ok(id) => id,
                Err(err) => return ServerMessage::error("VALIDATION_FAILED", err.to_string()),
            };
            let fields = data.populated_count();
            let update = NormalizedUpdate {
                user_id,
                kind: UpdateKind::Biometrics,
                source,
                reliability: reliability
                    .map(UnitInterval::new)
                    .unwrap_or_else(|| default_reliability(UpdateKind::Biometrics, source)),
                biometrics: Some(data),
                biomarkers: None,
                device_id,
                received_at: Timestamp::now(),
            };
            (update, fields)
        }
        ClientMessage::BiomarkerUpdate {
            source,
            data,
            reliability,
        } => {
            let fields = data.populated_count();
            let update = NormalizedUpdate {
                user_id,
                kind: UpdateKind::Biomarkers,
                source,
                reliability: reliability
                    .map(UnitInterval::new)
                    .unwrap_or_else(|| default_reliability(UpdateKind::Biomarkers, source)),
                biometrics: None,
                biomarkers: Some(data),
                device_id: None,
                received_at: Timestamp::now(),
            };
            (update, fields)
        }
    };

    let (update, fields) = update;
    match ingest.handle(update).await {
        Ok(()) => ServerMessage::BiometricUpdate { fields },
        Err(err) => ServerMessage::error(err.code().to_string(), err.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{TtlCache, DEFAULT_TTL};
    use crate::application::handlers::test_support::MockProfileStore;
    use crate::application::locks::UserLocks;
    use crate::domain::foundation::UserId;
    use crate::domain::profile::{Archetype, UserProfile};
    use crate::ports::ProfileStore;

    fn ingest_with(store: Arc<MockProfileStore>) -> IngestUpdateHandler {
        IngestUpdateHandler::new(
            store,
            Arc::new(TtlCache::new(DEFAULT_TTL)),
            Arc::new(UserLocks::new()),
            vec![],
        )
    }

    fn stored_profile() -> UserProfile {
        UserProfile::new(
            UserId::new(),
            Archetype::Performance,
            UnitInterval::new(0.9),
        )
    }

    #[tokio::test]
    async fn malformed_frames_get_error_events_and_do_not_poison_the_stream() {
        let profile = stored_profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));
        let ingest = ingest_with(store.clone());

        for _ in 0..10 {
            let reply = process_frame(&ingest, user_id, "{not json").await;
            assert!(matches!(reply, ServerMessage::Error { .. }));
        }

        // A well-formed eleventh frame still applies.
        let reply = process_frame(
            &ingest,
            user_id,
            r#"{"type": "biometric_update", "data": {"energy_level": 0.7}}"#,
        )
        .await;
        assert_eq!(reply, ServerMessage::BiometricUpdate { fields: 1 });

        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.biometrics.unwrap().energy_level,
            Some(UnitInterval::new(0.7))
        );
    }

    #[tokio::test]
    async fn ping_frames_get_pongs() {
        let store = Arc::new(MockProfileStore::new());
        let ingest = ingest_with(store);
        let reply = process_frame(&ingest, UserId::new(), r#"{"type": "ping"}"#).await;
        assert_eq!(reply, ServerMessage::Pong);
    }

    #[tokio::test]
    async fn device_reliability_defaults_per_source() {
        let profile = stored_profile();
        let user_id = profile.user_id;
        let store = Arc::new(MockProfileStore::new().with_profile(profile));
        let ingest = ingest_with(store.clone());

        let reply = process_frame(
            &ingest,
            user_id,
            r#"{"type": "biometric_update", "source": "manual", "data": {"stress_level": 0.5}}"#,
        )
        .await;
        assert_eq!(reply, ServerMessage::BiometricUpdate { fields: 1 });

        let stored = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.biometrics.unwrap().reliability,
            UnitInterval::new(0.8)
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_an_error_event() {
        let store = Arc::new(MockProfileStore::new());
        let ingest = ingest_with(store);
        let reply = process_frame(
            &ingest,
            UserId::new(),
            r#"{"type": "biometric_update", "data": {"energy_level": 0.5}}"#,
        )
        .await;
        match reply {
            ServerMessage::Error { code, .. } => assert_eq!(code, "PROFILE_NOT_FOUND"),
            other => panic!("expected error event, got {:?}", other),
        }
    }
}
