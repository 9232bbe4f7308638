use crate::domain::model::ScoreBounds;
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_ordered_bounds, validate_path,
    validate_positive_number, validate_range, Validate,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const BACKEND_RULES: &str = "rules";
pub const BACKEND_MODEL: &str = "model";

const MIN_BODY_BYTES: usize = 64;
const MAX_READ_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// 讀取完整請求（含本文）的時限
    pub read_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: 16 * 1024,
            read_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub backend: String,
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: BACKEND_RULES.to_string(),
            path: "model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub cgpa_min: f64,
    pub cgpa_max: f64,
    pub iq_min: f64,
    pub iq_max: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        let bounds = ScoreBounds::default();
        Self {
            cgpa_min: bounds.academic_min,
            cgpa_max: bounds.academic_max,
            iq_min: bounds.aptitude_min,
            iq_max: bounds.aptitude_max,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLACEMENT_PORT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.read_timeout_secs)
    }

    pub fn score_bounds(&self) -> ScoreBounds {
        ScoreBounds {
            academic_min: self.input.cgpa_min,
            academic_max: self.input.cgpa_max,
            aptitude_min: self.input.iq_min,
            aptitude_max: self.input.iq_max,
        }
    }

    pub fn uses_model(&self) -> bool {
        self.model.backend == BACKEND_MODEL
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_positive_number(
            "server.max_body_bytes",
            self.server.max_body_bytes,
            MIN_BODY_BYTES,
        )?;
        validate_range(
            "server.read_timeout_secs",
            self.server.read_timeout_secs,
            1,
            MAX_READ_TIMEOUT_SECS,
        )?;

        validate_one_of(
            "model.backend",
            &self.model.backend,
            &[BACKEND_RULES, BACKEND_MODEL],
        )?;
        if self.uses_model() {
            validate_path("model.path", &self.model.path)?;
        }

        validate_ordered_bounds("input.cgpa", self.input.cgpa_min, self.input.cgpa_max)?;
        validate_ordered_bounds("input.iq", self.input.iq_min, self.input.iq_max)?;

        if let Some(level) = &self.logging.level {
            validate_non_empty_string("logging.level", level)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
