//! Personalization request context.

use serde::{Deserialize, Serialize};

use crate::domain::profile::{Advisor, BiometricSample};

/// How much of Layer 2 runs.
///
/// Basic skips biomarker-derived insights for latency; Expert adds timing
/// recommendations on top of the Advanced set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Basic,
    #[default]
    Advanced,
    Expert,
}

/// What the user is asking the advisor for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    #[default]
    Guidance,
    CheckIn,
    PlanUpdate,
    Question,
}

/// Input to the personalization computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationContext {
    pub advisor: Advisor,
    #[serde(default)]
    pub request_kind: RequestKind,
    #[serde(default)]
    pub mode: Mode,
    /// Free-form session hint from the conversational consumer.
    pub session_context: Option<String>,
    /// Momentary readings that override stored biometrics for this one
    /// computation without being persisted.
    pub real_time: Option<BiometricSample>,
}

impl PersonalizationContext {
    /// Minimal context for an advisor with defaults everywhere else.
    pub fn for_advisor(advisor: Advisor) -> Self {
        Self {
            advisor,
            request_kind: RequestKind::default(),
            mode: Mode::default(),
            session_context: None,
            real_time: None,
        }
    }
}
