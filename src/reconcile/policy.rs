//! Confidence threshold policy

use tracing::debug;

use super::{
    AuditEvent, AuditEventType, Prediction, ReconcileError, RecommendedAction, ScenePredictions,
};

/// Predictions below this confidence go to manual review
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    threshold: f64,
}

/// Predictions split by the policy; scenes left empty on a side are dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyOutcome {
    pub accepted: Vec<ScenePredictions>,
    pub uncertain: Vec<ScenePredictions>,
    pub audit_events: Vec<AuditEvent>,
}

impl ThresholdPolicy {
    pub fn new(threshold: f64) -> Result<Self, ReconcileError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ReconcileError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn accepts(&self, prediction: &Prediction) -> bool {
        prediction.confidence >= self.threshold
    }

    pub fn apply(&self, scenes: &[ScenePredictions]) -> PolicyOutcome {
        let mut outcome = PolicyOutcome::default();

        for scene in scenes {
            let (accepted, uncertain): (Vec<Prediction>, Vec<Prediction>) = scene
                .predictions
                .iter()
                .cloned()
                .partition(|prediction| self.accepts(prediction));

            for prediction in &uncertain {
                let mut event = AuditEvent::new(
                    &scene.scene_id,
                    prediction,
                    AuditEventType::Uncertain,
                    RecommendedAction::ManualReview,
                );
                event.reason = Some(format!(
                    "Confidence {:.2} below threshold {:?}",
                    prediction.confidence, self.threshold
                ));
                outcome.audit_events.push(event);
            }

            debug!(
                scene_id = %scene.scene_id,
                accepted = accepted.len(),
                uncertain = uncertain.len(),
                "Threshold policy applied"
            );

            if !accepted.is_empty() {
                outcome.accepted.push(ScenePredictions {
                    scene_id: scene.scene_id.clone(),
                    predictions: accepted,
                });
            }
            if !uncertain.is_empty() {
                outcome.uncertain.push(ScenePredictions {
                    scene_id: scene.scene_id.clone(),
                    predictions: uncertain,
                });
            }
        }

        outcome
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, predictions: &[(&str, f64)]) -> ScenePredictions {
        ScenePredictions {
            scene_id: id.to_string(),
            predictions: predictions
                .iter()
                .map(|(name, confidence)| Prediction {
                    name: name.to_string(),
                    confidence: *confidence,
                })
                .collect(),
        }
    }

    #[test]
    fn splits_on_threshold_inclusive() {
        let policy = ThresholdPolicy::default();
        let outcome = policy.apply(&[scene("s1", &[("Arduino Kit", 0.90), ("Webcam", 0.89)])]);

        assert_eq!(outcome.accepted, vec![scene("s1", &[("Arduino Kit", 0.90)])]);
        assert_eq!(outcome.uncertain, vec![scene("s1", &[("Webcam", 0.89)])]);
        assert_eq!(outcome.audit_events.len(), 1);
        assert_eq!(
            outcome.audit_events[0].reason.as_deref(),
            Some("Confidence 0.89 below threshold 0.9")
        );
    }

    #[test]
    fn drops_scenes_with_nothing_on_a_side() {
        let policy = ThresholdPolicy::default();
        let outcome = policy.apply(&[
            scene("all-good", &[("Arduino Kit", 0.95)]),
            scene("all-doubtful", &[("Keyboard", 0.4)]),
            scene("empty", &[]),
        ]);

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].scene_id, "all-good");
        assert_eq!(outcome.uncertain.len(), 1);
        assert_eq!(outcome.uncertain[0].scene_id, "all-doubtful");
    }

    #[test]
    fn reason_keeps_decimal_point_on_whole_thresholds() {
        let policy = ThresholdPolicy::new(1.0).unwrap();
        let outcome = policy.apply(&[scene("s1", &[("Keyboard", 0.97)])]);

        assert_eq!(
            outcome.audit_events[0].reason.as_deref(),
            Some("Confidence 0.97 below threshold 1.0")
        );
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(ThresholdPolicy::new(0.0).is_ok());
        assert!(ThresholdPolicy::new(1.0).is_ok());
        assert_eq!(
            ThresholdPolicy::new(1.5),
            Err(ReconcileError::InvalidThreshold(1.5))
        );
        assert!(ThresholdPolicy::new(f64::NAN).is_err());
    }
}
