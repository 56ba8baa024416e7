//! Subscriber port for normalized biometric update fan-out

use async_trait::async_trait;

use crate::domain::foundation::{DeviceId, Timestamp, UnitInterval, UserId};
use crate::domain::profile::{BiomarkerSample, BiometricSample, UpdateKind, UpdateSource};

/// A validated update after source normalization, ready for merge and
/// for delivery to interested subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUpdate {
    pub user_id: UserId,
    pub kind: UpdateKind,
    pub source: UpdateSource,
    pub reliability: UnitInterval,
    pub biometrics: Option<BiometricSample>,
    pub biomarkers: Option<BiomarkerSample>,
    pub device_id: Option<DeviceId>,
    pub received_at: Timestamp,
}

/// Receives normalized updates after they are merged into the profile.
///
/// Delivery is best-effort; a slow subscriber loses updates rather than
/// stalling ingestion.
#[async_trait]
pub trait BiometricSubscriber: Send + Sync {
    async fn on_update(&self, update: &NormalizedUpdate);
}
