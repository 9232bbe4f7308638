use crate::utils::error::{PredictorError, Result};
use serde_json::Value;

pub const ACADEMIC_FIELD: &str = "cgpa";
pub const APTITUDE_FIELD: &str = "iq";

/// 可接受的輸入範圍（含端點）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBounds {
    pub academic_min: f64,
    pub academic_max: f64,
    pub aptitude_min: f64,
    pub aptitude_max: f64,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self {
            academic_min: 0.0,
            academic_max: 10.0,
            aptitude_min: 50.0,
            aptitude_max: 200.0,
        }
    }
}

impl ScoreBounds {
    fn check(&self, field: &str, value: f64, min: f64, max: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(PredictorError::invalid_input(
                field,
                format!("{} must be a finite number", field),
            ));
        }
        if value < min || value > max {
            return Err(PredictorError::invalid_input(
                field,
                format!("{} must be between {} and {}", field, min, max),
            ));
        }
        Ok(value)
    }
}

/// 單次請求的輸入值，用完即丟
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub academic_score: f64,
    pub aptitude_score: f64,
}

impl ScoreInput {
    pub fn new(academic_score: f64, aptitude_score: f64, bounds: &ScoreBounds) -> Result<Self> {
        Ok(Self {
            academic_score: bounds.check(
                ACADEMIC_FIELD,
                academic_score,
                bounds.academic_min,
                bounds.academic_max,
            )?,
            aptitude_score: bounds.check(
                APTITUDE_FIELD,
                aptitude_score,
                bounds.aptitude_min,
                bounds.aptitude_max,
            )?,
        })
    }

    /// 從表單欄位解析
    pub fn parse_fields(
        academic: Option<&str>,
        aptitude: Option<&str>,
        bounds: &ScoreBounds,
    ) -> Result<Self> {
        let academic = parse_number(ACADEMIC_FIELD, academic)?;
        let aptitude = parse_number(APTITUDE_FIELD, aptitude)?;
        Self::new(academic, aptitude, bounds)
    }

    /// 從 JSON 物件解析；數字或數字字串皆可
    pub fn from_json(body: &Value, bounds: &ScoreBounds) -> Result<Self> {
        let Value::Object(fields) = body else {
            return Err(PredictorError::invalid_input(
                "body",
                "request body must be a JSON object",
            ));
        };
        let academic = json_number(ACADEMIC_FIELD, fields.get(ACADEMIC_FIELD))?;
        let aptitude = json_number(APTITUDE_FIELD, fields.get(APTITUDE_FIELD))?;
        Self::new(academic, aptitude, bounds)
    }

    pub fn features(&self) -> [f64; 2] {
        [self.academic_score, self.aptitude_score]
    }
}

fn parse_number(field: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PredictorError::invalid_input(field, format!("missing field: {}", field)))?;
    raw.parse::<f64>()
        .map_err(|_| PredictorError::invalid_input(field, format!("{} must be a number", field)))
}

fn json_number(field: &str, value: Option<&Value>) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Err(PredictorError::invalid_input(
            field,
            format!("missing field: {}", field),
        )),
        Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
            PredictorError::invalid_input(field, format!("{} must be a number", field))
        }),
        Some(Value::String(text)) => parse_number(field, Some(text.as_str())),
        Some(_) => Err(PredictorError::invalid_input(
            field,
            format!("{} must be a number", field),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub placed: bool,
}

impl Decision {
    pub fn from_label(label: u8) -> Result<Self> {
        match label {
            0 => Ok(Self { placed: false }),
            1 => Ok(Self { placed: true }),
            other => Err(PredictorError::ClassifierError {
                message: format!("classifier returned label {} outside {{0, 1}}", other),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        if self.placed {
            "Will be placed"
        } else {
            "Will not be placed"
        }
    }
}
