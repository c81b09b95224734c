//! Shelf-scan reconciliation
//!
//! Scan predictions arrive as scenes, each listing the items a classifier
//! believes are on a shelf together with a confidence score. The pipeline
//! has two stages:
//! - the [`ThresholdPolicy`] splits predictions into accepted and uncertain
//! - [`reconcile`] compares accepted predictions against the store and
//!   produces one [`AuditEvent`] per prediction

pub mod policy;
pub mod report;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub use policy::{PolicyOutcome, ThresholdPolicy, DEFAULT_CONFIDENCE_THRESHOLD};
pub use report::{reconcile, Finding, ReconciliationReport};

/// One predicted item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub name: String,
    pub confidence: f64,
}

/// All predictions for one shelf scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePredictions {
    pub scene_id: String,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    Verified,
    Discrepancy,
    Uncertain,
    MissingFromDb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    #[serde(rename = "NONE")]
    NoAction,
    Investigate,
    ManualReview,
    AddToInventory,
}

/// Whether the item was seen with enough confidence to act on.
///
/// On the wire an observed item is `true` and an uncertain one `"uncertain"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Observed,
    Uncertain,
}

impl Serialize for Observation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Observation::Observed => serializer.serialize_bool(true),
            Observation::Uncertain => serializer.serialize_str("uncertain"),
        }
    }
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub scene_id: String,
    pub item: String,
    pub event_type: AuditEventType,
    pub confidence: f64,
    pub recommended_action: RecommendedAction,
    pub db_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<Observation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEvent {
    fn new(
        scene_id: &str,
        prediction: &Prediction,
        event_type: AuditEventType,
        recommended_action: RecommendedAction,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            scene_id: scene_id.to_string(),
            item: prediction.name.clone(),
            event_type,
            confidence: prediction.confidence,
            recommended_action,
            db_quantity: None,
            observed: None,
            issue: None,
            reason: None,
        }
    }
}

/// Reconciliation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    #[error("threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),
}
