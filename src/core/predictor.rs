use crate::adapters::classifier::load_classifier;
use crate::config::toml_config::{ModelSettings, BACKEND_MODEL};
use crate::core::decision::{matching_rule, rule_based_placement};
use crate::domain::model::{Decision, ScoreBounds, ScoreInput};
use crate::domain::ports::Classifier;
use crate::utils::error::{PredictorError, Result};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Rules,
    Model(Arc<dyn Classifier>),
    /// 設定要求模型但載入失敗；不會退回規則判斷
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct Predictor {
    backend: Backend,
    bounds: ScoreBounds,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("backend", &self.backend_name())
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl Predictor {
    pub fn rule_based(bounds: ScoreBounds) -> Self {
        Self {
            backend: Backend::Rules,
            bounds,
        }
    }

    pub fn with_classifier(classifier: Arc<dyn Classifier>, bounds: ScoreBounds) -> Self {
        Self {
            backend: Backend::Model(classifier),
            bounds,
        }
    }

    pub fn unavailable(reason: impl Into<String>, bounds: ScoreBounds) -> Self {
        Self {
            backend: Backend::Unavailable {
                reason: reason.into(),
            },
            bounds,
        }
    }

    /// 依設定建立；模型載入失敗時記錄錯誤並保持 unavailable，讓服務照常啟動
    pub fn from_config(settings: &ModelSettings, bounds: ScoreBounds) -> Self {
        if settings.backend != BACKEND_MODEL {
            tracing::info!("🧮 Using rule-based placement backend");
            return Self::rule_based(bounds);
        }

        match load_classifier(&settings.path) {
            Ok(classifier) => {
                tracing::info!(
                    "🧠 Loaded classifier from {} ({})",
                    settings.path,
                    classifier.describe()
                );
                Self::with_classifier(classifier, bounds)
            }
            Err(e) => {
                tracing::error!("❌ Model unavailable: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                Self::unavailable(e.to_string(), bounds)
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Rules => "rules",
            Backend::Model(_) => "model",
            Backend::Unavailable { .. } => "unavailable",
        }
    }

    pub fn bounds(&self) -> &ScoreBounds {
        &self.bounds
    }

    pub fn decide(&self, academic_score: f64, aptitude_score: f64) -> Result<Decision> {
        let input = ScoreInput::new(academic_score, aptitude_score, &self.bounds)?;
        self.decide_input(&input)
    }

    pub fn decide_input(&self, input: &ScoreInput) -> Result<Decision> {
        let decision = match &self.backend {
            Backend::Rules => {
                let placed = rule_based_placement(input.academic_score, input.aptitude_score);
                tracing::debug!(
                    "rule ladder: cgpa={} iq={} rule={:?} placed={}",
                    input.academic_score,
                    input.aptitude_score,
                    matching_rule(input.academic_score, input.aptitude_score),
                    placed
                );
                Decision { placed }
            }
            Backend::Model(classifier) => {
                let label = classifier.predict(&input.features())?;
                tracing::debug!(
                    "classifier: cgpa={} iq={} label={}",
                    input.academic_score,
                    input.aptitude_score,
                    label
                );
                Decision::from_label(label)?
            }
            Backend::Unavailable { reason } => {
                return Err(PredictorError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
        };
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;

    struct FixedLabel(u8);

    impl Classifier for FixedLabel {
        fn predict(&self, _features: &[f64; 2]) -> Result<u8> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_rule_based_decide() {
        let predictor = Predictor::rule_based(ScoreBounds::default());
        assert!(predictor.decide(8.0, 120.0).unwrap().placed);
        assert!(!predictor.decide(6.0, 90.0).unwrap().placed);
        assert_eq!(predictor.backend_name(), "rules");
    }

    #[test]
    fn test_decide_validates_before_evaluating() {
        let predictor = Predictor::rule_based(ScoreBounds::default());
        let err = predictor.decide(11.0, 150.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = predictor.decide(f64::NAN, 150.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_classifier_backend_is_used_instead_of_rules() {
        // 規則會錄取，但模型說不錄取
        let predictor =
            Predictor::with_classifier(Arc::new(FixedLabel(0)), ScoreBounds::default());
        assert!(!predictor.decide(9.0, 150.0).unwrap().placed);
        assert_eq!(predictor.backend_name(), "model");

        let predictor =
            Predictor::with_classifier(Arc::new(FixedLabel(1)), ScoreBounds::default());
        assert!(predictor.decide(1.0, 60.0).unwrap().placed);
    }

    #[test]
    fn test_unexpected_label_is_an_error() {
        let predictor =
            Predictor::with_classifier(Arc::new(FixedLabel(3)), ScoreBounds::default());
        let err = predictor.decide(7.0, 110.0).unwrap_err();
        assert!(matches!(err, PredictorError::ClassifierError { .. }));
    }

    #[test]
    fn test_unavailable_never_falls_back() {
        let predictor = Predictor::unavailable("model.json not found", ScoreBounds::default());
        let err = predictor.decide(9.0, 150.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(predictor.backend_name(), "unavailable");
    }

    #[test]
    fn test_invalid_input_reported_before_unavailable() {
        let predictor = Predictor::unavailable("missing", ScoreBounds::default());
        let err = predictor.decide(-1.0, 150.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_from_config_with_missing_artifact() {
        let settings = ModelSettings {
            backend: BACKEND_MODEL.to_string(),
            path: "/nonexistent/placement-model.json".to_string(),
        };
        let predictor = Predictor::from_config(&settings, ScoreBounds::default());
        assert_eq!(predictor.backend_name(), "unavailable");
        assert!(predictor.decide(8.0, 120.0).is_err());
    }

    #[test]
    fn test_from_config_rules() {
        let predictor = Predictor::from_config(&ModelSettings::default(), ScoreBounds::default());
        assert_eq!(predictor.backend_name(), "rules");
    }
}
