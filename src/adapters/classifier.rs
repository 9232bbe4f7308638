use crate::domain::ports::Classifier;
use crate::utils::error::{PredictorError, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

fn default_threshold() -> f64 {
    0.5
}

/// 標準化參數：z = (x - mean) / scale
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; 2],
    pub scale: [f64; 2],
}

/// 以 JSON 保存的邏輯迴歸模型
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    pub coefficients: [f64; 2],
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LinearModel {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let display = path.as_ref().display().to_string();
        let content =
            std::fs::read_to_string(&path).map_err(|e| PredictorError::ModelLoadError {
                path: display.clone(),
                reason: e.to_string(),
            })?;
        Self::from_json_str(&content).map_err(|e| PredictorError::ModelLoadError {
            path: display,
            reason: e.to_string(),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(content)?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<()> {
        if self
            .coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .any(|v| !v.is_finite())
        {
            return Err(PredictorError::ClassifierError {
                message: "coefficients and intercept must be finite".to_string(),
            });
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.iter().any(|v| !v.is_finite())
                || scaler.scale.iter().any(|v| !v.is_finite() || *v == 0.0)
            {
                return Err(PredictorError::ClassifierError {
                    message: "scaler mean must be finite and scale must be finite and non-zero"
                        .to_string(),
                });
            }
        }

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(PredictorError::ClassifierError {
                message: format!("threshold {} must be within (0, 1)", self.threshold),
            });
        }

        Ok(())
    }

    pub fn probability(&self, features: &[f64; 2]) -> f64 {
        let logit = features
            .iter()
            .enumerate()
            .fold(self.intercept, |acc, (i, &x)| {
                let z = match &self.scaler {
                    Some(scaler) => (x - scaler.mean[i]) / scaler.scale[i],
                    None => x,
                };
                acc + self.coefficients[i] * z
            });
        1.0 / (1.0 + (-logit).exp())
    }
}

impl Classifier for LinearModel {
    fn predict(&self, features: &[f64; 2]) -> Result<u8> {
        let probability = self.probability(features);
        if !probability.is_finite() {
            return Err(PredictorError::ClassifierError {
                message: "classifier produced a non-finite probability".to_string(),
            });
        }
        Ok(u8::from(probability >= self.threshold))
    }

    fn describe(&self) -> String {
        format!(
            "logistic regression, threshold {}{}",
            self.threshold,
            if self.scaler.is_some() { ", scaled" } else { "" }
        )
    }
}

/// 程序啟動時載入一次，之後以 Arc 共用
pub fn load_classifier(path: &str) -> Result<Arc<dyn Classifier>> {
    let model: Arc<dyn Classifier> = Arc::new(LinearModel::from_file(path)?);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MODEL_JSON: &str = r#"{
        "coefficients": [1.8, 1.2],
        "intercept": -0.4,
        "scaler": { "mean": [7.0, 110.0], "scale": [1.0, 15.0] }
    }"#;

    #[test]
    fn test_parse_model_with_default_threshold() {
        let model = LinearModel::from_json_str(MODEL_JSON).unwrap();
        assert_eq!(model.threshold, 0.5);
        assert!(model.scaler.is_some());
    }

    #[test]
    fn test_predict_separates_strong_and_weak_candidates() {
        let model = LinearModel::from_json_str(MODEL_JSON).unwrap();
        assert_eq!(model.predict(&[9.0, 140.0]).unwrap(), 1);
        assert_eq!(model.predict(&[5.0, 80.0]).unwrap(), 0);
        let p = model.probability(&[7.0, 110.0]);
        assert!((p - 1.0 / (1.0 + 0.4_f64.exp())).abs() < 1e-12);
    }

    #[test]
    fn test_unscaled_model() {
        let model =
            LinearModel::from_json_str(r#"{"coefficients": [1.0, 0.0], "intercept": -7.0}"#)
                .unwrap();
        assert_eq!(model.predict(&[7.5, 60.0]).unwrap(), 1);
        assert_eq!(model.predict(&[6.5, 190.0]).unwrap(), 0);
    }

    #[test]
    fn test_rejects_invalid_artifacts() {
        assert!(LinearModel::from_json_str("not json").is_err());
        assert!(LinearModel::from_json_str(r#"{"coefficients": [1.0], "intercept": 0.0}"#).is_err());
        assert!(LinearModel::from_json_str(
            r#"{"coefficients": [1.0, 1.0], "intercept": 0.0, "threshold": 1.5}"#
        )
        .is_err());
        assert!(LinearModel::from_json_str(
            r#"{"coefficients": [1.0, 1.0], "intercept": 0.0,
                "scaler": {"mean": [0.0, 0.0], "scale": [1.0, 0.0]}}"#
        )
        .is_err());
    }

    #[test]
    fn test_load_classifier_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MODEL_JSON.as_bytes()).unwrap();

        let classifier = load_classifier(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(classifier.predict(&[9.0, 140.0]).unwrap(), 1);
        assert!(classifier.describe().contains("scaled"));
    }

    #[test]
    fn test_load_classifier_missing_file() {
        let err = load_classifier("/nonexistent/model.json").err().unwrap();
        assert!(matches!(err, PredictorError::ModelLoadError { .. }));
    }
}
