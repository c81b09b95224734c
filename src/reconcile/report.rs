//! Observed vs declared inventory

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::policy::PolicyOutcome;
use super::{AuditEvent, AuditEventType, Observation, Prediction, RecommendedAction};
use crate::store::InventoryItem;

const DISCREPANCY_ISSUE: &str = "DB shows 0 quantity but item observed on shelf";
const DISCREPANCY_AUDIT_ISSUE: &str = "Quantity mismatch - item observed but DB shows 0";

/// One reconciled prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub scene_id: String,
    pub item: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

impl Finding {
    fn new(scene_id: &str, prediction: &Prediction) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            item: prediction.name.clone(),
            confidence: prediction.confidence,
            db_quantity: None,
            issue: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationDetails {
    pub verified: Vec<Finding>,
    pub discrepancies: Vec<Finding>,
    pub uncertain: Vec<Finding>,
    pub missing_from_db: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub verified_count: usize,
    pub discrepancy_count: usize,
    pub uncertain_count: usize,
    pub missing_from_db_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub summary: ReconciliationSummary,
    pub details: ReconciliationDetails,
    pub audit_events: Vec<AuditEvent>,
    /// Events raised by the threshold policy, one per uncertain prediction
    pub policy_events: Vec<AuditEvent>,
}

/// Compare the policy outcome against the current inventory.
pub fn reconcile(
    outcome: &PolicyOutcome,
    inventory: &[InventoryItem],
    threshold: f64,
) -> ReconciliationReport {
    // Later items shadow earlier ones sharing a name.
    let by_name: HashMap<&str, &InventoryItem> = inventory
        .iter()
        .map(|item| (item.name.as_str(), item))
        .collect();

    let mut details = ReconciliationDetails::default();
    let mut audit_events = Vec::new();

    for scene in &outcome.accepted {
        for prediction in &scene.predictions {
            let scene_id = scene.scene_id.as_str();
            let mut finding = Finding::new(scene_id, prediction);

            let event = match by_name.get(prediction.name.as_str()) {
                None => {
                    details.missing_from_db.push(finding);
                    AuditEvent::new(
                        scene_id,
                        prediction,
                        AuditEventType::MissingFromDb,
                        RecommendedAction::AddToInventory,
                    )
                }
                Some(item) if item.quantity > 0 => {
                    finding.db_quantity = Some(item.quantity);
                    details.verified.push(finding);

                    let mut event = AuditEvent::new(
                        scene_id,
                        prediction,
                        AuditEventType::Verified,
                        RecommendedAction::NoAction,
                    );
                    event.db_quantity = Some(item.quantity);
                    event
                }
                Some(item) => {
                    finding.db_quantity = Some(item.quantity);
                    finding.issue = Some(DISCREPANCY_ISSUE.to_string());
                    details.discrepancies.push(finding);

                    let mut event = AuditEvent::new(
                        scene_id,
                        prediction,
                        AuditEventType::Discrepancy,
                        RecommendedAction::Investigate,
                    );
                    event.db_quantity = Some(item.quantity);
                    event.issue = Some(DISCREPANCY_AUDIT_ISSUE.to_string());
                    event
                }
            };

            audit_events.push(AuditEvent {
                observed: Some(Observation::Observed),
                ..event
            });
        }
    }

    for scene in &outcome.uncertain {
        for prediction in &scene.predictions {
            details
                .uncertain
                .push(Finding::new(&scene.scene_id, prediction));

            let mut event = AuditEvent::new(
                &scene.scene_id,
                prediction,
                AuditEventType::Uncertain,
                RecommendedAction::ManualReview,
            );
            event.db_quantity = by_name
                .get(prediction.name.as_str())
                .map(|item| item.quantity);
            event.observed = Some(Observation::Uncertain);
            audit_events.push(event);
        }
    }

    for event in &outcome.audit_events {
        info!(
            target: "audit",
            scene_id = %event.scene_id,
            item = %event.item,
            event_type = ?event.event_type,
            confidence = event.confidence,
            recommended_action = ?event.recommended_action,
            reason = event.reason.as_deref().unwrap_or_default(),
            "Threshold policy event"
        );
    }

    for event in &audit_events {
        info!(
            target: "audit",
            scene_id = %event.scene_id,
            item = %event.item,
            event_type = ?event.event_type,
            confidence = event.confidence,
            recommended_action = ?event.recommended_action,
            db_quantity = ?event.db_quantity,
            "Reconciliation event"
        );
    }

    let summary = ReconciliationSummary {
        verified_count: details.verified.len(),
        discrepancy_count: details.discrepancies.len(),
        uncertain_count: details.uncertain.len(),
        missing_from_db_count: details.missing_from_db.len(),
    };

    ReconciliationReport {
        generated_at: Utc::now(),
        threshold,
        summary,
        details,
        audit_events,
        policy_events: outcome.audit_events.clone(),
    }
}
